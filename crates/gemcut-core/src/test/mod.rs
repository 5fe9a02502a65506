//! Unit-test support shared across modules.
