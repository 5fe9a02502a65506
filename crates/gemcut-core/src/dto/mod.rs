//!
//! Plain data envelopes returned across the crate boundary.
//!

pub mod page;

pub use page::{Page, PageRequest};
