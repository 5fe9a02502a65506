//!
//! Pure domain logic: selector derivation and filtering, the facet/cut value
//! types, response-code interpretation, token metadata and transfer
//! validation. Nothing in here performs I/O or holds shared state.
//!

pub mod facet;
pub mod response;
pub mod selector;
pub mod token;
pub mod transfer;
