//! Configuration models and loading for taskdeck.
//!
//! This crate owns the config schema shared by the server and the terminal
//! client: JSON5 on disk, serde-backed defaults, and post-parse validation.

mod error;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
