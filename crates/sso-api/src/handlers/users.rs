// ============================================================================
// SSO API - User Handlers
// File: crates/sso-api/src/handlers/users.rs
// ============================================================================
//! Registration and authentication HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use sso_core::SessionVars;
use sso_shared::constants::SESSION_ID_HEADER;
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

/// Credentials payload shared by register and login
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(rename = "authOk")]
    pub auth_ok: bool,
}

/// Register handler - POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let request = bind_request(payload)?;

    // Bad or taken names are refused before paying for a hash
    state
        .credentials
        .check_username_available(&request.username)
        .await
        .map_err(|e| ApiError::from_domain(e, "error creating user"))?;

    let hashed_password = state
        .credentials
        .hash_password(&request.password)
        .await
        .map_err(|e| ApiError::from_domain(e, "error creating user"))?;

    state
        .credentials
        .create_user(&request.username, &hashed_password)
        .await
        .map_err(|e| ApiError::from_domain(e, "error creating user"))?;

    Ok(StatusCode::CREATED)
}

/// Login handler - POST /v1/users/doAuth
///
/// On success a session is minted and its id returned in `x-session-id`.
pub async fn authenticate_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let request = bind_request(payload)?;

    let authed = match state
        .credentials
        .authenticate_user(&request.username, &request.password)
        .await
    {
        Ok(authed) => authed,
        // Unknown user is an expected outcome, nothing to page on
        Err(e) if e.is_not_found() => false,
        Err(e) => {
            error!("Error authorizing user: {}", e);
            return Err(ApiError::InternalError("error authorizing user".to_string()));
        }
    };

    let mut headers = HeaderMap::new();
    if authed {
        let session_id = state
            .sessions
            .create_session(&request.username, SessionVars::new())
            .await
            .map_err(|e| ApiError::from_domain(e, "error creating session"))?;

        let value = HeaderValue::from_str(&session_id)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        headers.insert(HeaderName::from_static(SESSION_ID_HEADER), value);
    }

    Ok((headers, Json(AuthResponse { auth_ok: authed })))
}

fn bind_request(payload: Result<Json<UserRequest>, JsonRejection>) -> Result<UserRequest, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!("Error binding request body: {}", e);
        ApiError::BadRequest("error processing body".to_string())
    })?;

    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest("missing username and/or password".to_string()));
    }
    Ok(request)
}
