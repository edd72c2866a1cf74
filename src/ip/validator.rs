//! Syntactic IPv4 validation.

use std::net::Ipv4Addr;

/// Check if a string is a valid IPv4 dotted quad.
///
/// Accepts exactly four dot-separated decimal octets in `0..=255`. Empty
/// strings, extra segments, non-numeric segments, surrounding whitespace and
/// leading-zero octets (`"01"`) are all rejected.
///
/// # Examples
/// ```
/// use netsift::ip::validator::is_valid_ipv4;
///
/// assert!(is_valid_ipv4("130.45.67.89"));
/// assert!(!is_valid_ipv4("130.45.67"));
/// assert!(!is_valid_ipv4(" 130.45.67.89"));
/// ```
pub fn is_valid_ipv4(ip: &str) -> bool {
    ip.parse::<Ipv4Addr>().is_ok()
}

/// Parse the first octet of a valid IPv4 address.
///
/// Returns `None` when the address does not validate.
pub fn first_octet(ip: &str) -> Option<u8> {
    ip.parse::<Ipv4Addr>().ok().map(|addr| addr.octets()[0])
}
