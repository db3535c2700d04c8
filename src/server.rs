//! HTTP boundary for the transformation engine.
//!
//! Health endpoints delegate to a [`HealthCheckService`]; the transform
//! endpoint runs a policy document through a shared registry and returns the
//! domain policy together with every reported problem.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::config::ServiceConfig;
use crate::document;
use crate::health::{HealthCheckResult, HealthCheckService, HealthStatus};
use crate::model::Policy;
use crate::transform::{Problem, TransformerRegistry};

pub struct AppState {
    pub registry: Arc<TransformerRegistry>,
    pub health: Arc<dyn HealthCheckService>,
    pub config: ServiceConfig,
}

/// Build the router over explicit application state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check/health", get(check_health))
        .route("/check/startup", get(check_startup))
        .route("/check/liveness", get(check_liveness))
        .route("/check/readiness", get(check_readiness))
        .route("/policies/transform", post(transform_policy))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    is_system_healthy: bool,
    component_results: Vec<HealthCheckResult>,
}

fn health_response(status: HealthStatus) -> (StatusCode, Json<HealthResponse>) {
    let healthy = status.is_healthy();
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        Json(HealthResponse {
            is_system_healthy: healthy,
            component_results: status.component_results,
        }),
    )
}

/// Overall health; reports the startup status.
async fn check_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    health_response(state.health.startup_status())
}

async fn check_startup(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    health_response(state.health.startup_status())
}

async fn check_liveness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    health_response(state.health.liveness())
}

async fn check_readiness(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    health_response(state.health.readiness())
}

#[derive(Debug, Serialize)]
struct TransformResponse {
    policy: Option<Policy>,
    problems: Vec<Problem>,
}

/// Transform a JSON-LD policy object into the domain policy
async fn transform_policy(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<Json<TransformResponse>, AppError> {
    let input: Value = serde_json::from_str(&body)
        .map_err(|e| AppError::ValidationError(format!("Invalid JSON: {}", e)))?;

    let depth = document::depth(&input);
    if depth > state.config.max_document_depth {
        return Err(AppError::ValidationError(format!(
            "Document nesting depth {} exceeds maximum of {}",
            depth, state.config.max_document_depth
        )));
    }

    let transformed = state.registry.transform::<Policy>(&input);
    tracing::debug!(
        "transformed policy with {} problem(s)",
        transformed.problems.len()
    );

    let (policy, problems) = transformed.into_parts();
    Ok(Json(TransformResponse { policy, problems }))
}

// Error handling

#[derive(Debug)]
enum AppError {
    ValidationError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
