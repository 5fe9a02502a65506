//!
//! Utility helpers shared across the gemcut crates: keccak hashing, hex and
//! string formatting for log output, and wall-clock time. Each submodule is a
//! small focused toolkit used by the core registry and transfer layers.
//!

pub mod format;
pub mod hash;
pub mod time;
