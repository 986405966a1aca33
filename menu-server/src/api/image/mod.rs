//! Image serving API module (public)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/image/{filename}", get(handler::serve))
}
