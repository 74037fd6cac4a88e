//! Error handling for the vgen generation core.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` and
//! implements conversions from the loader error types.
//!
//! # Examples
//!
//! ```
//! use vgen_core::error::{Error, Result};
//!
//! fn might_fail(known: bool) -> Result<()> {
//!     if !known {
//!         return Err(Error::model("unknown interface"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail(true).is_ok());
//! ```

use thiserror::Error;

use crate::model::TypeKind;

/// Result type for vgen generation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vgen generation operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The model references something it does not define
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A default token was requested for a field kind that has none
    #[error("Unsupported type for field {field} - found {kind}, but expected string or bytes")]
    UnsupportedFieldType { field: String, kind: TypeKind },

    /// A generation unit task could not be joined
    #[error("Generation task failed: {0}")]
    Join(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new model error
    pub fn model<S: Into<String>>(msg: S) -> Self {
        Self::Model(msg.into())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Join(e.to_string())
    }
}
