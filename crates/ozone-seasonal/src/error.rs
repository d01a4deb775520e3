use ozone_core::error::OzoneError;

#[derive(Debug, thiserror::Error)]
pub enum SeasonalError {
    #[error("invalid month {0}: expected 1-12")]
    InvalidMonth(u32),
    #[error("unknown tip: {0}")]
    UnknownTip(String),
    #[error("storage error: {0}")]
    Storage(#[from] OzoneError),
}

impl From<SeasonalError> for OzoneError {
    fn from(err: SeasonalError) -> Self {
        match err {
            SeasonalError::InvalidMonth(_) => OzoneError::InvalidInput(err.to_string()),
            SeasonalError::UnknownTip(_) => OzoneError::NotFound(err.to_string()),
            SeasonalError::Storage(inner) => inner,
        }
    }
}
