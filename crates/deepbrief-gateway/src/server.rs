//! Gateway server: accepts brief requests, maps engine errors to phases

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use deepbrief_core::{BriefRequest, Error, FinalBrief};
use deepbrief_engine::{Engine, RunOutcome};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub struct GatewayConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8787,
        }
    }
}

struct GatewayState {
    engine: Arc<Engine>,
}

/// Outbound result: the brief's stable field names, plus an optional
/// warning when the brief was produced but could not be stored.
#[derive(Serialize)]
pub struct BriefResponse {
    #[serde(flatten)]
    pub brief: FinalBrief,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<RunOutcome> for BriefResponse {
    fn from(outcome: RunOutcome) -> Self {
        Self {
            brief: outcome.brief,
            warning: outcome.store_warning,
        }
    }
}

pub async fn start_gateway(engine: Arc<Engine>, config: GatewayConfig) -> anyhow::Result<()> {
    let state = Arc::new(GatewayState { engine });

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/brief", post(brief_handler))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state);

    let bind_addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address: {}", e))?;

    info!("Deepbrief gateway v{} starting", env!("CARGO_PKG_VERSION"));
    info!("  Listening on: {}", bind_addr);
    info!("  Briefs:       http://{}/brief", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "deepbrief",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn brief_handler(
    State(state): State<Arc<GatewayState>>,
    Json(request): Json<BriefRequest>,
) -> Response {
    info!(
        "Brief requested by '{}': '{}' (follow_up={})",
        request.identity, request.topic, request.follow_up
    );

    match state.engine.run(request, None).await {
        Ok(outcome) => (StatusCode::OK, Json(BriefResponse::from(outcome))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Map engine errors to a response naming the failing phase where one exists.
fn error_response(error: Error) -> Response {
    let status = match &error {
        Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        Error::StageFailed { .. } | Error::SchemaViolation { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let mut body = serde_json::json!({ "error": error.to_string() });
    if let Some(stage) = error.stage() {
        body["stage"] = serde_json::json!(stage.as_str());
    }
    (status, Json(body)).into_response()
}
