use axum::{Router, middleware};
use std::net::SocketAddr;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::{Config, ServerState};
use crate::utils::AppError;

/// HTTP access log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    let status = response.status();

    tracing::info!(target: "http_access", "{} {} {}", method, uri, status);

    response
}

/// Build the Axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Core APIs
        .merge(crate::api::auth::router())
        .merge(crate::api::health::router())
        // Customer-facing APIs
        .merge(crate::api::menu::router())
        .merge(crate::api::image::router())
        .merge(crate::api::qrcode::router())
        // Admin APIs
        .merge(crate::api::dishes::router())
        .merge(crate::api::categories::router())
        .merge(crate::api::upload::router())
}

/// Attach state and the middleware stack. Integration tests call this
/// directly and drive the router with `oneshot`.
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // require_auth skips the public routes internally
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

/// HTTP server wrapper around the router
pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    /// Serve until ctrl-c, then shut down gracefully.
    pub async fn run(self) -> Result<(), AppError> {
        let config: &Config = &self.state.config;
        let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
        let app = build_router(self.state.clone());

        tracing::info!("Starting HTTP server on {}", addr);

        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
                shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(10)));
            }
        });

        axum_server::bind(addr)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
