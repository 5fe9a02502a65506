//!
//! Strongly-typed identifiers used throughout the registry and the token
//! service layer: 20-byte addresses, 4-byte function selectors and the
//! canonical function signatures selectors are derived from.
//!

mod address;
mod selector;

pub use address::Address;
pub use selector::{FunctionSignature, Selector};

use crate::ThisError;

///
/// IdError
///

#[derive(Debug, ThisError)]
pub enum IdError {
    #[error("invalid address '{0}': expected 20 bytes of hex")]
    InvalidAddress(String),

    #[error("invalid selector '{0}': expected 4 bytes of hex")]
    InvalidSelector(String),

    #[error("invalid function signature '{signature}': {reason}")]
    InvalidSignature {
        signature: String,
        reason: &'static str,
    },
}
