//! Common error types for casebridge

use crate::schema::{PayloadKind, SchemaVersion};
use thiserror::Error;

/// Common result type for casebridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the casebridge crates
#[derive(Error, Debug)]
pub enum Error {
    /// Payload matched none of the known schema versions
    #[error("Unsupported {kind} schema: payload matched none of {attempted:?}")]
    UnsupportedSchemaVersion {
        kind: PayloadKind,
        attempted: Vec<SchemaVersion>,
    },

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
