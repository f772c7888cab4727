//! Authentication handlers: register, login, logout, me

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, AuthUser, CreatedResponse, SuccessResponse, SESSION_COOKIE};
use tally_core::Error;

/// Request body for registration and login
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/register - Create a new user account
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    if req.password.len() < 8 {
        return Err(AppError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let id = state
        .db
        .create_user(&req.username, &req.password)
        .map_err(|e| match e {
            Error::Conflict(msg) => AppError::conflict(&msg),
            Error::InvalidData(msg) => AppError::bad_request(&msg),
            other => other.into(),
        })?;

    info!(username = %req.username.trim(), "Registered new user");

    Ok(Json(CreatedResponse { id }))
}

/// Response for a successful login
#[derive(Serialize)]
pub struct LoginResponse {
    /// Session token; also delivered via the session cookie
    pub token: String,
    pub username: String,
}

/// POST /api/login - Verify credentials and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Response, AppError> {
    let user = state
        .db
        .verify_password(req.username.trim(), &req.password)?
        .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

    let token = state.sessions.create(user.id, &user.username).await;

    info!(username = %user.username, "User logged in");

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token
    );

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token,
            username: user.username,
        }),
    )
        .into_response())
}

/// POST /api/logout - Destroy the current session (and its daily limit)
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Response, AppError> {
    state.sessions.remove(&auth.token).await;

    info!(username = %auth.username, "User logged out");

    // Expire the cookie on the client as well
    let cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SuccessResponse { success: true }),
    )
        .into_response())
}

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: i64,
    pub username: String,
}

/// GET /api/me - The currently authenticated user
pub async fn get_me(Extension(auth): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: auth.user_id,
        username: auth.username,
    })
}
