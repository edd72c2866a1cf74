//! IPv4 validation, Class B classification and network registry.
//!
//! These are the leaf components of the pipeline: everything downstream
//! works in terms of [`NetworkKey`] and [`MatchStatus`].

pub mod classifier;
pub mod registry;
pub mod validator;

// Re-export commonly used types
pub use classifier::{classify, Classification, NetworkKey, B_CLASS_FIRST_OCTETS};
pub use registry::{MatchStatus, NetworkRegistry};
pub use validator::is_valid_ipv4;
