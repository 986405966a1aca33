//! Customer menu API module (public)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/menu", get(handler::get_menu))
}
