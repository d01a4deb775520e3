//! Route handlers.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ozone_assistant::ReplySource;
use ozone_core::types::{
    ConversationMessage, EmissionsResult, HistoryEntry, LifestyleInput, Sender, Tip,
};
use ozone_estimator::{compare, render_text_report, Comparison};
use ozone_seasonal::{current_month, month_name, tips_for_month, Season};

use crate::error::ApiError;
use crate::state::{AppState, DeviceId};

// =============================================================================
// Request and response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub models_configured: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct EstimateParams {
    /// Append the result to history. Defaults to true.
    pub save: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EstimateResponse {
    /// History entry id, absent when the result was not saved.
    pub id: Option<Uuid>,
    pub result: EmissionsResult,
    pub comparison: Comparison,
}

#[derive(Debug, Deserialize)]
pub struct TipsParams {
    pub month: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TipsResponse {
    pub month: u32,
    pub month_name: String,
    pub season: Season,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Deserialize)]
pub struct AddTipRequest {
    pub tip_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanResponse {
    /// False when the tip was already in the plan.
    pub added: bool,
    pub tips: Vec<Tip>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ConversationMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: ConversationMessage,
    /// True when the reply came from the offline responder.
    pub degraded: bool,
    pub source: ReplySource,
}

fn parse_entry_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid history id: {}", raw)))
}

// =============================================================================
// Health
// =============================================================================

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        models_configured: state.assistant.models().len(),
    })
}

// =============================================================================
// Estimates and history
// =============================================================================

/// POST /estimate - score a lifestyle form and append it to history.
pub async fn estimate(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Query(params): Query<EstimateParams>,
    Json(input): Json<LifestyleInput>,
) -> Result<(StatusCode, Json<EstimateResponse>), ApiError> {
    let result = state.estimator.estimate(&input);
    let comparison = compare(&result);

    let (status, id) = if params.save.unwrap_or(true) {
        let entry = state.history.append(&device, &result)?;
        tracing::info!(device = %device, id = %entry.id, total = result.total, "Saved estimate");
        (StatusCode::CREATED, Some(entry.id))
    } else {
        (StatusCode::OK, None)
    };

    Ok((
        status,
        Json(EstimateResponse {
            id,
            result,
            comparison,
        }),
    ))
}

/// GET /history
pub async fn list_history(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(state.history.load(&device)?))
}

/// DELETE /history/{id}
pub async fn delete_history(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_entry_id(&id)?;
    if state.history.remove(&device, id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("History entry {} not found", id)))
    }
}

/// GET /history/{id}/report - plain-text report download.
pub async fn history_report(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_entry_id(&id)?;
    let entry = state
        .history
        .get(&device, id)?
        .ok_or_else(|| ApiError::NotFound(format!("History entry {} not found", id)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"carbon-footprint-report.txt\"",
            ),
        ],
        render_text_report(&entry.result),
    ))
}

// =============================================================================
// Seasonal tips and plan
// =============================================================================

/// GET /tips?month=N - defaults to the current month.
pub async fn tips(Query(params): Query<TipsParams>) -> Result<Json<TipsResponse>, ApiError> {
    let month = params.month.unwrap_or_else(current_month);
    let tips = tips_for_month(month)?;
    Ok(Json(TipsResponse {
        month,
        month_name: month_name(month)?.to_string(),
        season: Season::from_month(month)?,
        tips,
    }))
}

/// GET /plan
pub async fn list_plan(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
) -> Result<Json<Vec<Tip>>, ApiError> {
    Ok(Json(state.plan.list(&device)?))
}

/// POST /plan - 201 when newly saved, 200 when already present.
pub async fn add_to_plan(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Json(body): Json<AddTipRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), ApiError> {
    let added = state.plan.add(&device, body.tip_id.trim())?;
    let status = if added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(PlanResponse {
            added,
            tips: state.plan.list(&device)?,
        }),
    ))
}

/// DELETE /plan/{tip_id}
pub async fn remove_from_plan(
    State(state): State<AppState>,
    DeviceId(device): DeviceId,
    Path(tip_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.plan.remove(&device, &tip_id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Tip {} is not in the plan", tip_id)))
    }
}

// =============================================================================
// Assistant
// =============================================================================

/// POST /chat - reply to the latest user message in the given history.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let has_question = body
        .messages
        .iter()
        .any(|m| m.sender == Sender::User && !m.text.trim().is_empty());
    if !has_question {
        return Err(ApiError::BadRequest(
            "messages must contain a non-empty user message".to_string(),
        ));
    }

    let reply = state.assistant.respond_detailed(&body.messages).await;
    let next_id = body
        .messages
        .iter()
        .map(|m| m.id)
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    Ok(Json(ChatResponse {
        degraded: reply.is_degraded(),
        reply: ConversationMessage::bot(next_id, reply.text),
        source: reply.source,
    }))
}
