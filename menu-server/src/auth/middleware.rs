//! Authentication middleware
//!
//! Axum middleware guarding the admin API. Tokens are accepted from the
//! `session` cookie or an `Authorization: Bearer` header.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;

use crate::auth::{AdminSession, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Name of the session cookie set on login
pub const SESSION_COOKIE: &str = "session";

/// Routes reachable without a token. Everything else under /api/
/// requires a valid admin session.
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if path.starts_with("/api/menu") || path.starts_with("/api/image/") {
        return true;
    }
    if path == "/api/categories" && method == http::Method::GET {
        return true;
    }
    matches!(
        path,
        "/api/auth/login" | "/api/auth/check" | "/api/auth/logout"
    )
}

/// Pull a session token from the cookie header or the Authorization header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers
        .get(http::header::COOKIE)
        .and_then(|h| h.to_str().ok())
    {
        for pair in cookies.split(';') {
            let value = pair
                .trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='));
            if let Some(value) = value
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(|t| t.to_string())
}

/// Authentication middleware for the admin API
///
/// Skipped for CORS preflight, non-API paths and the public routes
/// listed in [`is_public_route`]. On success an [`AdminSession`] is
/// inserted into the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();

    if is_public_route(req.method(), path) {
        // a valid token still attaches a session, so public handlers
        // can tell admins apart from anonymous callers
        if let Some(token) = token_from_headers(req.headers())
            && let Ok(claims) = jwt_service.validate_token(&token)
        {
            req.extensions_mut().insert(AdminSession::from(claims));
        }
        return Ok(next.run(req).await);
    }
    let token = match token_from_headers(req.headers()) {
        Some(token) => token,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(&token) {
        Ok(claims) => {
            let session = AdminSession::from(claims);
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}
