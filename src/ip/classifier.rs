//! Class B membership and canonical /16 network keys.
//!
//! An address belongs to a Class B network when it is a valid IPv4 dotted
//! quad whose first octet lies in `128..=191`. Its network key is the text
//! before the last two dot-separated segments followed by `.0.0/16`.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::validator::first_octet;

/// First-octet range of Class B addresses
pub const B_CLASS_FIRST_OCTETS: RangeInclusive<u8> = 128..=191;

/// Suffix appended to the two-octet prefix of every network key
pub const NETWORK_SUFFIX: &str = ".0.0/16";

/// Canonical `"{o1}.{o2}.0.0/16"` identifier of a Class B network.
///
/// Ordering is lexicographic on the string form, which is the tie-break
/// order used by every ranking in the crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkKey(String);

impl NetworkKey {
    fn from_prefix(prefix: &str) -> Self {
        NetworkKey(format!("{}{}", prefix, NETWORK_SUFFIX))
    }

    /// Normalize an external network spelling into a key.
    ///
    /// Accepts `"130.45"`, `"130.45."`, `"130.45.0.0"` and `"130.45.0.0/16"`.
    /// Returns `None` when what remains is not two decimal octets.
    ///
    /// # Examples
    /// ```
    /// use netsift::ip::NetworkKey;
    ///
    /// let key = NetworkKey::normalize("130.45.").unwrap();
    /// assert_eq!(key.as_str(), "130.45.0.0/16");
    /// assert_eq!(NetworkKey::normalize("130.45.0.0/16"), Some(key));
    /// assert!(NetworkKey::normalize("not-a-network").is_none());
    /// ```
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_end_matches('.');
        let without_mask = trimmed.strip_suffix("/16").unwrap_or(trimmed);
        let prefix = without_mask.strip_suffix(".0.0").unwrap_or(without_mask);

        let mut octets = prefix.split('.');
        let valid = match (octets.next(), octets.next(), octets.next()) {
            (Some(a), Some(b), None) => is_canonical_octet(a) && is_canonical_octet(b),
            _ => false,
        };

        valid.then(|| Self::from_prefix(prefix))
    }

    /// Full key text, e.g. `"130.45.0.0/16"`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-octet prefix, e.g. `"130.45"`
    pub fn prefix(&self) -> &str {
        self.0.strip_suffix(NETWORK_SUFFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for NetworkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_canonical_octet(s: &str) -> bool {
    s.parse::<u8>().map_or(false, |n| n.to_string() == s)
}

/// Outcome of classifying one address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Valid Class B address and its /16 network
    Network(NetworkKey),
    /// Invalid address, or valid but outside Class B
    None,
}

impl Classification {
    pub fn network(&self) -> Option<&NetworkKey> {
        match self {
            Classification::Network(key) => Some(key),
            Classification::None => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Network(key) => write!(f, "{}", key),
            Classification::None => write!(f, "NONE"),
        }
    }
}

/// Classify an already-trimmed address.
///
/// Re-validates the address, so any string may be passed. Never fails; an
/// address that is not a valid Class B IPv4 address yields
/// [`Classification::None`].
///
/// # Examples
/// ```
/// use netsift::ip::{classify, Classification};
///
/// let outcome = classify("130.45.67.89");
/// assert_eq!(outcome.to_string(), "130.45.0.0/16");
/// assert_eq!(classify("8.8.8.8"), Classification::None);
/// ```
pub fn classify(address: &str) -> Classification {
    match first_octet(address) {
        Some(octet) if B_CLASS_FIRST_OCTETS.contains(&octet) => {
            // "a.b.c.d" splits from the right into "d", "c", "a.b"
            match address.rsplitn(3, '.').nth(2) {
                Some(prefix) => Classification::Network(NetworkKey::from_prefix(prefix)),
                None => Classification::None,
            }
        }
        _ => Classification::None,
    }
}
