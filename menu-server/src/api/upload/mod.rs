//! Image upload API module (admin only)

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/upload", post(handler::upload))
        // multipart overhead on top of the 5MB image limit
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}
