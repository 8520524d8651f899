//! GET /user handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{parse_user_id, ApiError};
use crate::server::ServerState;
use crate::storage::StoreError;

/// Query parameters for GET /user.
#[derive(Debug, Deserialize)]
pub struct GetUserParams {
    pub id: Option<String>,
}

/// Client-facing user representation.
///
/// Deliberately a separate type from the store record: the credential hash
/// has no field here, so it can never leak into a response body.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Handle GET /user - fetch a user's display attributes.
#[tracing::instrument(name = "http.get_user", skip(state, params), fields(user.id = tracing::field::Empty))]
pub async fn handle_get_user(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<GetUserParams>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = parse_user_id(params.id.as_deref())?;
    tracing::Span::current().record("user.id", id);

    let store = state.store.clone();
    let span = tracing::Span::current();

    let record = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        match store.fetch(id) {
            Ok(record) => Ok(record),
            Err(StoreError::NotFound) => Err(ApiError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch user");
                Err(e.into())
            }
        }
    })
    .await
    .map_err(|_| ApiError::Internal)??;

    Ok(Json(UserResponse {
        id: record.id,
        name: record.name,
        email: record.email,
    }))
}
