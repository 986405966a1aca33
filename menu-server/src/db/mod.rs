//! Database Module
//!
//! Embedded SurrealDB with RocksDB storage. Tests run the same service
//! against the in-memory engine.

pub mod models;
pub mod repository;

use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "menu";
const DATABASE: &str = "menu";

/// Owns the database handle and hands out repositories
#[derive(Clone)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the RocksDB-backed database at the given path.
    pub async fn new(path: &Path) -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<RocksDb>(path).await?;
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        Ok(Self { db })
    }

    /// Wrap an already-connected handle. Used by tests with the Mem engine.
    pub async fn from_connection(db: Surreal<Db>) -> Result<Self, surrealdb::Error> {
        db.use_ns(NAMESPACE).use_db(DATABASE).await?;
        Ok(Self { db })
    }

    pub fn connection(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn dishes(&self) -> repository::DishRepository {
        repository::DishRepository::new(self.db.clone())
    }

    pub fn categories(&self) -> repository::CategoryRepository {
        repository::CategoryRepository::new(self.db.clone())
    }
}
