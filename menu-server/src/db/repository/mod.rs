//! Repository Module
//!
//! CRUD operations for SurrealDB tables.

pub mod category;
pub mod dish;

pub use category::CategoryRepository;
pub use dish::DishRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:key" strings everywhere above the repository layer
// =============================================================================
//
// surrealdb::RecordId handles all ids:
//   - parse: let id: RecordId = "dish:abc".parse()?;
//   - build: RecordId::from_table_key("dish", "abc")
//   - CRUD: db.select((table, key)) / db.delete((table, key))
//
// A dish's category column stores the canonical "category:key" string,
// never a record link, so reads need no FETCH and comparisons are plain
// string equality.

/// Strip a leading "table:" prefix so both "dish:abc" and "abc" resolve.
pub(crate) fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::record_key;

    #[test]
    fn record_key_strips_matching_prefix_only() {
        assert_eq!(record_key("dish", "dish:abc"), "abc");
        assert_eq!(record_key("dish", "abc"), "abc");
        assert_eq!(record_key("dish", "category:abc"), "category:abc");
    }
}
