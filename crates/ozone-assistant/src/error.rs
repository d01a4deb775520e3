//! Error types for the chat assistant.

use ozone_core::error::OzoneError;

/// A single failed attempt against the completion gateway.
///
/// Every variant is recoverable: the responder moves on to the next model
/// or to the offline reply.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("gateway returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while building the assistant.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("invalid fallback keywords in group '{group}': {reason}")]
    InvalidKeywords { group: String, reason: String },
    #[error("gateway setup failed: {0}")]
    GatewaySetup(String),
}

impl From<AssistantError> for OzoneError {
    fn from(err: AssistantError) -> Self {
        OzoneError::Config(err.to_string())
    }
}
