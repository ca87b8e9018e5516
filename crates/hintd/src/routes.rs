//! API routes for hintd

use crate::check::{check_title, CheckStatus, CHECK_CASES, PROBE_TITLE};
use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hint_common::{
    ErrorResponse, GenerationCheckResponse, HealthResponse, HintError, HintRequest,
    NotFoundResponse,
};
use std::sync::Arc;
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

/// Routes listed in 404 responses
pub const AVAILABLE_ROUTES: &[&str] = &[
    "GET /health",
    "POST /api/hint",
    "GET /api/test-generation",
];

// ============================================================================
// Hint Routes
// ============================================================================

pub fn hint_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/hint", post(request_hint))
        .route("/api/test-generation", get(test_generation))
}

async fn request_hint(
    State(state): State<AppStateArc>,
    payload: Result<Json<HintRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            warn!("Rejected hint request body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let Some(title) = req.validated_title() else {
        let err = HintError::Validation;
        return error_response(status_of(&err), err.to_string());
    };

    let result = state.resolver.resolve(title).await;
    info!("Answered '{}' from {}", title, result.source);
    Json(result).into_response()
}

async fn test_generation(State(state): State<AppStateArc>) -> Response {
    let expected = CHECK_CASES
        .iter()
        .find(|(title, _)| *title == PROBE_TITLE)
        .map(|(_, keyword)| *keyword)
        .unwrap_or_default();
    let generator = state.resolver.generator();
    let outcome = check_title(generator.as_ref(), PROBE_TITLE, expected).await;

    match outcome.status {
        CheckStatus::Failed(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GenerationCheckResponse {
                success: false,
                hint: None,
                error: Some(e.to_string()),
                message: "Generation API test failed".to_string(),
            }),
        )
            .into_response(),
        CheckStatus::Passed | CheckStatus::Weak => Json(GenerationCheckResponse {
            success: true,
            hint: outcome.hint,
            error: None,
            message: "Generation API is working correctly!".to_string(),
        })
        .into_response(),
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: "hintd".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Fallback
// ============================================================================

pub async fn not_found() -> (StatusCode, Json<NotFoundResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Route not found".to_string(),
            available_routes: AVAILABLE_ROUTES.iter().map(|r| r.to_string()).collect(),
        }),
    )
}

fn status_of(err: &HintError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
