//! Auth API Handlers
//!
//! Session login for the single admin account. The token travels both
//! as an HttpOnly cookie (browser admin UI) and in the JSON body
//! (scripted clients sending it as a Bearer header).

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::auth::SESSION_COOKIE;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::validation::MAX_PASSWORD_LEN;
use crate::utils::{AppError, AppResult};

/// Fixed delay on failed logins, applied regardless of which check failed
const LOGIN_FAILURE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

fn session_cookie(state: &ServerState, token: &str, max_age: i64) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}"
    );
    if state.config.is_production() {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    // cap the input before it reaches the hash function
    if payload.password.len() > MAX_PASSWORD_LEN {
        security_log!("WARN", "login_failed", username = payload.username.clone());
        tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
        return Err(AppError::invalid_credentials());
    }

    if !state.admin.verify(&payload.username, &payload.password) {
        security_log!("WARN", "login_failed", username = payload.username.clone());
        tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(state.admin.username())
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    security_log!("INFO", "login_ok", username = payload.username.clone());

    let max_age = state.jwt_service.config.expiration_minutes * 60;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&state, &token, max_age)
            .parse()
            .map_err(|_| AppError::internal("Invalid cookie value"))?,
    );

    Ok((
        headers,
        Json(LoginResponse {
            token,
            username: state.admin.username().to_string(),
        }),
    ))
}

/// GET /api/auth/check - is the caller holding a valid session?
///
/// Always 200; the body says whether the token checks out. Public so
/// the admin UI can probe before showing the login form.
pub async fn check(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Json<CheckResponse> {
    let claims = crate::auth::token_from_headers(&headers)
        .and_then(|token| state.jwt_service.validate_token(&token).ok());

    match claims {
        Some(claims) => Json(CheckResponse {
            authenticated: true,
            username: Some(claims.sub),
        }),
        None => Json(CheckResponse {
            authenticated: false,
            username: None,
        }),
    }
}

/// POST /api/auth/logout - clear the session cookie
pub async fn logout(State(state): State<ServerState>) -> AppResult<impl IntoResponse> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&state, "", 0)
            .parse()
            .map_err(|_| AppError::internal("Invalid cookie value"))?,
    );
    Ok((headers, Json(serde_json::json!({ "success": true }))))
}
