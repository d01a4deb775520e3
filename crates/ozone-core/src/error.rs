use thiserror::Error;

/// Top-level error type for Ozone Guard.
///
/// Subsystem crates define their own error types where they need richer
/// detail and convert into `OzoneError` at crate boundaries so that `?`
/// works across the workspace.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OzoneError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for OzoneError {
    fn from(err: toml::de::Error) -> Self {
        OzoneError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for OzoneError {
    fn from(err: toml::ser::Error) -> Self {
        OzoneError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for OzoneError {
    fn from(err: serde_json::Error) -> Self {
        OzoneError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Ozone Guard operations.
pub type Result<T> = std::result::Result<T, OzoneError>;
