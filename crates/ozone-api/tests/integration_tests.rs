//! End-to-end tests for the Ozone API, each against fresh in-memory state.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use ozone_api::create_router;
use ozone_api::handlers::{EstimateResponse, HealthResponse, PlanResponse, TipsResponse};
use ozone_api::state::AppState;
use ozone_assistant::{CompletionGateway, CompletionRequest, GatewayError};
use ozone_core::config::{FallbackConfig, OzoneConfig};
use ozone_core::types::{HistoryEntry, Tip};
use ozone_storage::{
    Database, InMemoryHistoryRepository, InMemoryTipPlanRepository, SqliteHistoryRepository,
    SqliteTipPlanRepository,
};

// =============================================================================
// Helpers
// =============================================================================

/// Gateway that answers every model with the same text, or fails.
struct FixedGateway(Option<&'static str>);

#[async_trait]
impl CompletionGateway for FixedGateway {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, GatewayError> {
        match self.0 {
            Some(text) => Ok(text.to_string()),
            None => Err(GatewayError::MissingCredential),
        }
    }
}

fn make_state(reply: Option<&'static str>) -> AppState {
    AppState::new(
        OzoneConfig::default(),
        Arc::new(InMemoryHistoryRepository::new()),
        Arc::new(InMemoryTipPlanRepository::new()),
        Arc::new(FixedGateway(reply)),
    )
    .unwrap()
}

fn make_app() -> axum::Router {
    create_router(make_state(None))
}

fn get(uri: &str, device: &str) -> Request<Body> {
    Request::get(uri)
        .header("x-device-id", device)
        .body(Body::empty())
        .unwrap()
}

fn delete(uri: &str, device: &str) -> Request<Body> {
    Request::delete(uri)
        .header("x-device-id", device)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, device: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("x-device-id", device)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json<T: serde::de::DeserializeOwned>(resp: axum::response::Response) -> T {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

fn reference_form() -> Value {
    json!({
        "transportationType": "car",
        "distance": "100",
        "fuelType": "gasoline",
        "flightHours": "",
        "electricityUsage": 0,
        "meatConsumption": "low",
        "dairyConsumption": "low",
        "wasteRecycled": "most",
        "shoppingHabits": "low"
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let resp = make_app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let health: HealthResponse = body_json(resp).await;
    assert_eq!(health.status, "healthy");
    assert_eq!(health.models_configured, 3);
}

// =============================================================================
// Estimate and history
// =============================================================================

#[tokio::test]
async fn test_estimate_saves_to_history() {
    let app = make_app();

    let resp = app
        .clone()
        .oneshot(post_json("/estimate", "phone", reference_form()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: EstimateResponse = body_json(resp).await;
    assert_eq!(created.result.total, 14.9);
    assert_eq!(created.result.breakdown.transport, 12.0);
    assert_eq!(created.result.recommendations.len(), 1);
    assert_eq!(created.comparison.annual_kg, 178.8);
    let id = created.id.unwrap();

    let resp = app.oneshot(get("/history", "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, id);
    assert_eq!(history[0].result.total, 14.9);
}

#[tokio::test]
async fn test_estimate_without_saving() {
    let app = make_app();

    let resp = app
        .clone()
        .oneshot(post_json("/estimate?save=false", "phone", reference_form()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let created: EstimateResponse = body_json(resp).await;
    assert!(created.id.is_none());

    let resp = app.oneshot(get("/history", "phone")).await.unwrap();
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_estimate_accepts_empty_form() {
    let resp = make_app()
        .oneshot(post_json("/estimate", "phone", json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: EstimateResponse = body_json(resp).await;
    // Unknown mode at 0 km, medium/medium food, unknown recycling, unknown shopping.
    assert_eq!(created.result.breakdown.transport, 0.0);
    assert_eq!(created.result.breakdown.waste, 1.2);
}

#[tokio::test]
async fn test_estimate_rejects_malformed_json() {
    let req = Request::post("/estimate")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = make_app().oneshot(req).await.unwrap();
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_history_is_per_device() {
    let app = make_app();
    app.clone()
        .oneshot(post_json("/estimate", "phone", reference_form()))
        .await
        .unwrap();

    let resp = app.oneshot(get("/history", "laptop")).await.unwrap();
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_missing_device_header_uses_configured_default() {
    let app = make_app();
    let req = Request::post("/estimate")
        .header("content-type", "application/json")
        .body(Body::from(reference_form().to_string()))
        .unwrap();
    app.clone().oneshot(req).await.unwrap();

    let default_device = OzoneConfig::default().general.device_id;
    let resp = app.oneshot(get("/history", &default_device)).await.unwrap();
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_blank_device_header_rejected() {
    let resp = make_app().oneshot(get("/history", "   ")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_delete_history_entry() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(post_json("/estimate", "phone", reference_form()))
        .await
        .unwrap();
    let created: EstimateResponse = body_json(resp).await;
    let uri = format!("/history/{}", created.id.unwrap());

    let resp = app.clone().oneshot(delete(&uri, "laptop")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.clone().oneshot(delete(&uri, "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app.clone().oneshot(delete(&uri, "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app.oneshot(get("/history", "phone")).await.unwrap();
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_delete_history_invalid_id() {
    let resp = make_app()
        .oneshot(delete("/history/not-a-uuid", "phone"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_history_report_download() {
    let app = make_app();
    let resp = app
        .clone()
        .oneshot(post_json("/estimate", "phone", reference_form()))
        .await
        .unwrap();
    let created: EstimateResponse = body_json(resp).await;

    let uri = format!("/history/{}/report", created.id.unwrap());
    let resp = app.oneshot(get(&uri, "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    let disposition = resp.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains("carbon-footprint-report.txt"));

    let text = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(text.starts_with("Carbon Footprint Report"));
    assert!(text.contains("Total Emissions: 14.9 kg CO2"));
}

#[tokio::test]
async fn test_history_report_unknown_entry() {
    let uri = format!("/history/{}/report", uuid::Uuid::new_v4());
    let resp = make_app().oneshot(get(&uri, "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Tips and plan
// =============================================================================

#[tokio::test]
async fn test_tips_for_month() {
    let resp = make_app().oneshot(get("/tips?month=10", "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let tips: TipsResponse = body_json(resp).await;
    assert_eq!(tips.month, 10);
    assert_eq!(tips.month_name, "October");
    assert_eq!(tips.tips.len(), 3);
    assert_eq!(tips.tips[0].title, "Leaf Management");
}

#[tokio::test]
async fn test_tips_default_to_current_month() {
    let resp = make_app().oneshot(get("/tips", "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let tips: TipsResponse = body_json(resp).await;
    assert!((1..=12).contains(&tips.month));
}

#[tokio::test]
async fn test_tips_invalid_month() {
    let resp = make_app().oneshot(get("/tips?month=13", "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_plan_lifecycle() {
    let app = make_app();

    let resp = app
        .clone()
        .oneshot(post_json("/plan", "phone", json!({"tip_id": "spring-gardening"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let plan: PlanResponse = body_json(resp).await;
    assert!(plan.added);
    assert_eq!(plan.tips.len(), 1);

    let resp = app
        .clone()
        .oneshot(post_json("/plan", "phone", json!({"tip_id": "spring-gardening"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let plan: PlanResponse = body_json(resp).await;
    assert!(!plan.added);
    assert_eq!(plan.tips.len(), 1);

    let resp = app.clone().oneshot(get("/plan", "phone")).await.unwrap();
    let tips: Vec<Tip> = body_json(resp).await;
    assert_eq!(tips[0].id, "spring-gardening");

    let resp = app
        .clone()
        .oneshot(delete("/plan/spring-gardening", "phone"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(delete("/plan/spring-gardening", "phone"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_plan_unknown_tip() {
    let resp = make_app()
        .oneshot(post_json("/plan", "phone", json!({"tip_id": "nope"})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Chat
// =============================================================================

fn chat_body(question: &str) -> Value {
    json!({
        "messages": [
            {"id": 1, "text": "Hi! How can I help?", "sender": "bot"},
            {"id": 2, "text": question, "sender": "user"}
        ]
    })
}

#[tokio::test]
async fn test_chat_model_reply() {
    let app = create_router(make_state(Some("Try cycling to work.")));
    let resp = app
        .oneshot(post_json("/chat", "phone", chat_body("How do I commute greener?")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = body_json(resp).await;
    assert_eq!(body["reply"]["text"], "Try cycling to work.");
    assert_eq!(body["reply"]["sender"], "bot");
    assert_eq!(body["reply"]["id"], 3);
    assert_eq!(body["degraded"], false);
    assert_eq!(body["source"]["kind"], "model");
}

#[tokio::test]
async fn test_chat_falls_back_offline() {
    let resp = make_app()
        .oneshot(post_json("/chat", "phone", chat_body("Is recycling worth it?")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = body_json(resp).await;
    let fallback = FallbackConfig::default();
    let text = body["reply"]["text"].as_str().unwrap();
    assert!(text.ends_with(&fallback.offline_notice));
    assert!(text.starts_with(&fallback.groups[2].reply));
    assert_eq!(body["degraded"], true);
    assert_eq!(body["source"]["detail"], "all_models_failed");
}

#[tokio::test]
async fn test_chat_reply_id_saturates_at_max() {
    let body = json!({
        "messages": [
            {"id": u64::MAX, "text": "What about solar panels?", "sender": "user"}
        ]
    });
    let resp = create_router(make_state(Some("Solar helps.")))
        .oneshot(post_json("/chat", "phone", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = body_json(resp).await;
    assert_eq!(body["reply"]["id"], u64::MAX);
}

#[tokio::test]
async fn test_chat_requires_user_message() {
    let body = json!({"messages": [{"id": 1, "text": "Hello", "sender": "bot"}]});
    let resp = make_app()
        .oneshot(post_json("/chat", "phone", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// SQLite-backed state
// =============================================================================

#[tokio::test]
async fn test_sqlite_backed_state() {
    let db = Arc::new(Database::in_memory().unwrap());
    let state = AppState::new(
        OzoneConfig::default(),
        Arc::new(SqliteHistoryRepository::new(db.clone())),
        Arc::new(SqliteTipPlanRepository::new(db)),
        Arc::new(FixedGateway(None)),
    )
    .unwrap();
    let app = create_router(state);

    app.clone()
        .oneshot(post_json("/estimate", "phone", reference_form()))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/plan", "phone", json!({"tip_id": "winter-efficient-heating"})))
        .await
        .unwrap();

    let resp = app.clone().oneshot(get("/history", "phone")).await.unwrap();
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].result.total, 14.9);

    let resp = app.oneshot(get("/plan", "phone")).await.unwrap();
    let tips: Vec<Tip> = body_json(resp).await;
    assert_eq!(tips[0].title, "Efficient Heating");
}

#[tokio::test]
async fn test_sqlite_history_survives_huge_amounts() {
    let db = Arc::new(Database::in_memory().unwrap());
    let state = AppState::new(
        OzoneConfig::default(),
        Arc::new(SqliteHistoryRepository::new(db.clone())),
        Arc::new(SqliteTipPlanRepository::new(db)),
        Arc::new(FixedGateway(None)),
    )
    .unwrap();
    let app = create_router(state);

    let mut form = reference_form();
    form["distance"] = json!(1e308);
    form["transportationType"] = json!("flight");
    form["flightHours"] = json!(1e308);
    form["electricityUsage"] = json!([1, 2]);
    let resp = app
        .clone()
        .oneshot(post_json("/estimate", "phone", form))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.clone().oneshot(get("/history", "phone")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Vec<HistoryEntry> = body_json(resp).await;
    assert_eq!(history.len(), 1);
    let result = &history[0].result;
    assert!(result.total.is_finite());
    assert_eq!(result.breakdown.electricity, 0.0);
    assert_eq!(result.breakdown.transport, 9.0e10);
}
