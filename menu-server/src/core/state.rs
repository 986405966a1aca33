use std::path::PathBuf;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::{AdminCredentials, JwtService};
use crate::core::Config;
use crate::db::DbService;
use crate::menu::FuzzyMatcher;

/// Server state shared by every request handler
///
/// Shallow-clones via Arc fields, so handing it to axum's `with_state`
/// is cheap.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | jwt_service | session token service |
/// | admin | the single admin account, hashed at startup |
/// | fuzzy | search matcher shared by menu requests |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub admin: Arc<AdminCredentials>,
    pub fuzzy: FuzzyMatcher,
}

impl ServerState {
    /// Manual construction, used by tests with an in-memory database.
    pub fn new(
        config: Config,
        db: Surreal<Db>,
        jwt_service: Arc<JwtService>,
        admin: Arc<AdminCredentials>,
    ) -> Self {
        Self {
            config,
            db,
            jwt_service,
            admin,
            fuzzy: FuzzyMatcher::default(),
        }
    }

    /// Initialize the full server state.
    ///
    /// Creates the work directory layout, opens the database at
    /// `work_dir/database/menu.db` and hashes the admin password.
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        let work_dir = PathBuf::from(&config.work_dir);
        std::fs::create_dir_all(work_dir.join("database"))?;
        std::fs::create_dir_all(work_dir.join("uploads"))?;
        std::fs::create_dir_all(work_dir.join("logs"))?;

        let db_path = work_dir.join("database").join("menu.db");
        let db_service = DbService::new(&db_path).await?;

        if config.admin_password.is_empty() {
            anyhow::bail!("ADMIN_PASSWORD must be set");
        }
        let admin = AdminCredentials::new(&config.admin_username, &config.admin_password)
            .map_err(|e| anyhow::anyhow!("admin credential setup failed: {e}"))?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(
            config.clone(),
            db_service.connection(),
            jwt_service,
            Arc::new(admin),
        ))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.work_dir().join("uploads")
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    pub fn dishes(&self) -> crate::db::repository::DishRepository {
        crate::db::repository::DishRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> crate::db::repository::CategoryRepository {
        crate::db::repository::CategoryRepository::new(self.db.clone())
    }
}
