//! Ozone API crate - local axum server over the estimator, history,
//! seasonal tips and chat assistant.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::{AppState, DeviceId};
