//! Utility functions

pub mod hash;

pub use hash::{fingerprint, fingerprint_exact};
