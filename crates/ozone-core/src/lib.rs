pub mod config;
pub mod error;
pub mod types;

pub use config::OzoneConfig;
pub use error::{OzoneError, Result};
pub use types::*;
