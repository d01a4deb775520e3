//! Shared handler state.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use ozone_assistant::{AssistantResponder, CompletionGateway};
use ozone_core::config::OzoneConfig;
use ozone_core::error::OzoneError;
use ozone_estimator::Estimator;
use ozone_seasonal::TipPlan;
use ozone_storage::{HistoryRepository, TipPlanRepository};

use crate::error::ApiError;

/// Header naming the device whose history and plan a request works on.
pub const DEVICE_HEADER: &str = "x-device-id";

const MAX_DEVICE_ID_LEN: usize = 128;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OzoneConfig>,
    pub estimator: Arc<Estimator>,
    pub history: Arc<dyn HistoryRepository>,
    pub plan: Arc<TipPlan>,
    pub assistant: Arc<AssistantResponder>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        config: OzoneConfig,
        history: Arc<dyn HistoryRepository>,
        tips: Arc<dyn TipPlanRepository>,
        gateway: Arc<dyn CompletionGateway>,
    ) -> Result<Self, OzoneError> {
        let assistant = AssistantResponder::new(gateway, &config.assistant, &config.fallback)?;
        Ok(Self {
            estimator: Arc::new(Estimator::new(config.recommendations.clone())),
            history,
            plan: Arc::new(TipPlan::new(tips)),
            assistant: Arc::new(assistant),
            config: Arc::new(config),
            start_time: Instant::now(),
        })
    }
}

/// Device id from the `X-Device-Id` header, or the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(pub String);

impl FromRequestParts<AppState> for DeviceId {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(DEVICE_HEADER) else {
            return Ok(DeviceId(state.config.general.device_id.clone()));
        };

        let id = value
            .to_str()
            .map_err(|_| ApiError::BadRequest("X-Device-Id must be visible ASCII".to_string()))?
            .trim();

        if id.is_empty() || id.len() > MAX_DEVICE_ID_LEN {
            return Err(ApiError::BadRequest(format!(
                "X-Device-Id must be 1-{} characters",
                MAX_DEVICE_ID_LEN
            )));
        }

        Ok(DeviceId(id.to_string()))
    }
}
