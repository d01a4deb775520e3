//! Router setup and server startup.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use ozone_core::config::OzoneConfig;
use ozone_core::error::OzoneError;

use crate::handlers;
use crate::state::{AppState, DEVICE_HEADER};

/// Request bodies are small JSON forms and chat histories.
const BODY_LIMIT: usize = 256 * 1024;

fn local_origins(port: u16) -> Vec<HeaderValue> {
    let dev_port = port.saturating_add(1);
    [port, dev_port]
        .iter()
        .flat_map(|p| [format!("http://127.0.0.1:{}", p), format!("http://localhost:{}", p)])
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect()
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(local_origins(state.config.general.port)))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(DEVICE_HEADER),
        ]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/estimate", post(handlers::estimate))
        .route("/history", get(handlers::list_history))
        .route("/history/{id}", delete(handlers::delete_history))
        .route("/history/{id}/report", get(handlers::history_report))
        .route("/tips", get(handlers::tips))
        .route(
            "/plan",
            get(handlers::list_plan).post(handlers::add_to_plan),
        )
        .route("/plan/{tip_id}", delete(handlers::remove_from_plan))
        .route("/chat", post(handlers::chat))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve on 127.0.0.1 at the configured port until the process exits.
pub async fn start_server(config: &OzoneConfig, state: AppState) -> Result<(), OzoneError> {
    let addr = format!("127.0.0.1:{}", config.general.port);
    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| OzoneError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, router).await?;

    Ok(())
}
