//! Utilities
//!
//! - `constants`: namespace names, cache bounds and environment variable names

pub mod constants;
