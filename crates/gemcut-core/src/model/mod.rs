//!
//! In-process state: the facet registry (both routing tables behind one
//! lock) and the bounded log buffer.
//!

pub mod log;
pub mod registry;
