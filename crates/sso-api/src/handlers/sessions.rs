// ============================================================================
// SSO API - Session Handlers
// File: crates/sso-api/src/handlers/sessions.rs
// ============================================================================
//! Session read, update and destroy HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sso_core::{SessionRecord, SessionVars};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetSessionRequest {
    #[serde(rename = "sessionVars")]
    pub session_vars: Option<SessionVars>,
}

/// GET /v1/sessions/{session_id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    match state.sessions.get_session(&session_id).await {
        Ok(Some(session)) => Ok(Json(session)),
        Ok(None) => Err(ApiError::NotFound("session not found".to_string())),
        Err(e) => Err(ApiError::from_domain(e, "error locating session")),
    }
}

/// PUT /v1/sessions/{session_id}
pub async fn set_session_vars(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SetSessionRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("Error binding request body: {}", e);
        ApiError::BadRequest("error processing body".to_string())
    })?;

    let session_vars = request
        .session_vars
        .ok_or_else(|| ApiError::BadRequest("missing body".to_string()))?;

    state
        .sessions
        .set_session_vars(&session_id, session_vars)
        .await
        .map_err(|e| ApiError::from_domain(e, "error updating session"))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /v1/sessions/{session_id}
pub async fn destroy_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .destroy_session(&session_id)
        .await
        .map_err(|e| ApiError::from_domain(e, "error destroying session"))?;

    Ok(StatusCode::NO_CONTENT)
}
