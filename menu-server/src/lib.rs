//! Menu Server - bilingual restaurant menu backend
//!
//! # Overview
//!
//! Serves the customer-facing menu (fuzzy search, dietary and spice
//! filters, category ordering) and the admin API (dish and category
//! CRUD, image upload, QR codes) from one embedded-database binary.
//!
//! # Module structure
//!
//! ```text
//! menu-server/src/
//! ├── core/          # config, state, HTTP server
//! ├── auth/          # JWT sessions, admin credentials, middleware
//! ├── menu/          # pure menu filter pipeline
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # models and repositories (SurrealDB)
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod menu;
pub mod utils;

// Re-export the public types
pub use auth::{AdminSession, JwtService};
pub use core::{Config, Server, ServerState};
pub use menu::{FuzzyMatcher, MenuQuery, compute_menu};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - supports tracing format specifiers
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging. Called once at startup.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}
