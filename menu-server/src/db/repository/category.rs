//! Category Repository
//!
//! Record keys are the category slug at creation time, so canonical ids
//! read as "category:starters". `order` is a reserved word in SurrealQL,
//! so sorting happens in Rust instead of ORDER BY.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all categories (including inactive), sorted by menu order
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.base.db().query("SELECT * FROM category").await?.take(0)?;
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    /// Find active categories, sorted by menu order
    pub async fn find_active(&self) -> RepoResult<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE active = true")
            .await?
            .take(0)?;
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let key = record_key(TABLE, id);
        let category: Option<Category> = self.base.db().select((TABLE, key)).await?;
        Ok(category)
    }

    /// Find category by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Category>> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category keyed by its slug
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.slug
            )));
        }

        let category = Category {
            id: None,
            name: data.name,
            slug: data.slug.clone(),
            order: data.order,
            active: data.active,
        };

        let created: Option<Category> = self
            .base
            .db()
            .create((TABLE, data.slug.as_str()))
            .content(category)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        // Check duplicate slug if changing
        if let Some(ref new_slug) = data.slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_slug
            )));
        }

        let thing = RecordId::from_table_key(TABLE, key);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category, refusing while dishes still reference it
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let key = record_key(TABLE, id);
        if self.find_by_id(key).await?.is_none() {
            return Err(RepoError::NotFound(format!("Category {} not found", id)));
        }

        let canonical = format!("{TABLE}:{key}");
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM dish WHERE category = $cat GROUP ALL")
            .bind(("cat", canonical))
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        if count.unwrap_or(0) > 0 {
            return Err(RepoError::Validation(
                "Cannot delete a category that still has dishes".into(),
            ));
        }

        let _: Option<Category> = self.base.db().delete((TABLE, key)).await?;
        Ok(true)
    }
}
