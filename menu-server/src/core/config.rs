use crate::auth::JwtConfig;
use crate::db::models::Locale;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | /var/lib/menu-server | data directory (database, uploads, logs) |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | BASE_URL | http://localhost:3000 | public URL encoded into QR codes |
/// | DEFAULT_LOCALE | pt | menu language when a request names none |
/// | ADMIN_USERNAME | admin | admin account name |
/// | ADMIN_PASSWORD | (required) | admin password, hashed at startup |
/// | ENVIRONMENT | development | development or production |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/menu HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Data directory holding the database, uploads and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Public base URL, used as the default QR code target
    pub base_url: String,
    /// Locale used when a request does not pick one
    pub default_locale: Locale,
    /// Admin account name
    pub admin_username: String,
    /// Admin password, only held until hashed at startup
    pub admin_password: String,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// development | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables, with defaults for
    /// anything unset.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/menu-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            default_locale: std::env::var("DEFAULT_LOCALE")
                .ok()
                .and_then(|l| l.parse().ok())
                .unwrap_or_default(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_default(),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the test-relevant fields. Used by integration tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
