//! POST /user/auth handler.

use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_user_id, ApiError};
use crate::auth::AuthOutcome;
use crate::server::ServerState;
use crate::storage::StoreError;

/// Form fields for POST /user/auth.
#[derive(Debug, Deserialize)]
pub struct AuthParams {
    pub id: Option<String>,
    pub password: Option<String>,
}

/// Body returned on a successful check.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// Handle POST /user/auth - check a submitted credential.
///
/// The lookup and the hash comparison run on the blocking pool: the
/// comparison is uninterruptible by design and its latency observation is
/// emitted inside `verify`, so a client disconnect only turns the response
/// write into a no-op.
#[tracing::instrument(name = "http.auth_user", skip(state, params), fields(user.id = tracing::field::Empty))]
pub async fn handle_auth(
    State(state): State<Arc<ServerState>>,
    Form(params): Form<AuthParams>,
) -> Result<Json<AuthStatus>, ApiError> {
    let id = parse_user_id(params.id.as_deref())?;
    tracing::Span::current().record("user.id", id);

    // A missing password field is checked as the empty string.
    let password = params.password.unwrap_or_default();

    let store = state.store.clone();
    let authenticator = state.authenticator.clone();
    let span = tracing::Span::current();

    let outcome = tokio::task::spawn_blocking(move || -> Result<AuthOutcome, ApiError> {
        let _guard = span.enter();
        let record = match store.fetch(id) {
            Ok(record) => record,
            Err(StoreError::NotFound) => return Err(ApiError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch user");
                return Err(e.into());
            }
        };
        Ok(authenticator.verify(&record, &password))
    })
    .await
    .map_err(|_| ApiError::Internal)??;

    if outcome.matched {
        Ok(Json(AuthStatus { status: "OK" }))
    } else {
        // Mismatch and malformed-hash are indistinguishable to the caller.
        Err(ApiError::Unauthenticated)
    }
}
