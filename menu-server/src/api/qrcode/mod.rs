//! QR code API module (admin only)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/qrcode", get(handler::generate))
}
