//! HTTP handlers for the users-api.

pub mod auth;
pub mod users;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::observability::propagation::extract_remote_context;
use crate::server::ServerState;
use crate::storage::StoreError;

/// Client-facing error taxonomy for the HTTP surface.
///
/// A mismatch and a malformed stored hash both collapse into
/// `Unauthenticated`: revealing which one occurred would hand an external
/// caller an oracle, so the two are only distinguished in telemetry.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing user ID")]
    MissingId,

    #[error("Invalid user ID: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("No such user")]
    NotFound,

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Failed to get user: {0}")]
    Store(StoreError),

    #[error("Internal error")]
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            other => ApiError::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingId | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store details go to the log, not to the client.
        let body = match &self {
            ApiError::Store(_) => "Failed to get user".to_string(),
            other => other.to_string(),
        };

        (status, body).into_response()
    }
}

/// Parse the user identifier from its query/form representation.
///
/// Fails fast on a missing or non-numeric identifier, before any store
/// access. An empty string counts as missing.
pub(crate) fn parse_user_id(raw: Option<&str>) -> Result<i64, ApiError> {
    let raw = raw
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::MissingId)?;
    Ok(raw.parse::<i64>()?)
}

/// Create the HTTP router.
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/user", get(users::handle_get_user))
        .route("/user/auth", post(auth::handle_auth))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Create the per-request span, parented to the remote trace context when the
/// caller sent one.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let span = tracing::info_span!(
        "http_request",
        http.method = %request.method(),
        http.path = %request.uri().path(),
    );
    span.set_parent(extract_remote_context(request.headers()));
    span
}

/// Handle GET /health - Basic health check.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Handle GET /ready - Readiness check.
async fn ready_handler() -> impl IntoResponse {
    (StatusCode::OK, "READY")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id_accepts_numeric() {
        assert_eq!(parse_user_id(Some("42")).unwrap(), 42);
    }

    #[test]
    fn test_parse_user_id_rejects_missing() {
        assert!(matches!(parse_user_id(None), Err(ApiError::MissingId)));
        assert!(matches!(parse_user_id(Some("")), Err(ApiError::MissingId)));
    }

    #[test]
    fn test_parse_user_id_rejects_non_numeric() {
        assert!(matches!(
            parse_user_id(Some("abc")),
            Err(ApiError::InvalidId(_))
        ));
    }

    #[test]
    fn test_store_error_maps_to_not_found_or_internal() {
        let not_found: ApiError = StoreError::NotFound.into();
        assert!(matches!(not_found, ApiError::NotFound));

        let db_error: ApiError = StoreError::Database(rusqlite::Error::InvalidQuery).into();
        assert!(matches!(db_error, ApiError::Store(_)));
    }

    #[test]
    fn test_unauthenticated_body_reveals_nothing() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
