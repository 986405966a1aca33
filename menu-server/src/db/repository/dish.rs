//! Dish Repository

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{
    BadgeType, Category, CategoryRef, DietaryInfo, Dish, DishCreate, DishImage, DishUpdate,
    LocalizedText, clamp_spice_level, normalize_compare_at_price,
};
use rust_decimal::Decimal;
use serde::Serialize;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "dish";
const CATEGORY_TABLE: &str = "category";

/// Merge payload for partial dish updates
///
/// Double-optional fields serialize an explicit null when the caller
/// clears them and are skipped entirely when left unchanged.
#[derive(Debug, Serialize)]
struct DishUpdateDb {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    compare_at_price: Option<Option<Decimal>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<DishImage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dietary_info: Option<DietaryInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allergens: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    spice_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    badges: Option<Vec<BadgeType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    search_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<bool>,
}

/// Prefix a bare category key with its table name.
fn canonical_category(id: &str) -> String {
    let key = record_key(CATEGORY_TABLE, id);
    format!("{CATEGORY_TABLE}:{key}")
}

#[derive(Clone)]
pub struct DishRepository {
    base: BaseRepository,
}

impl DishRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all dishes (including unavailable), ordered by display_order
    pub async fn find_all(&self) -> RepoResult<Vec<Dish>> {
        let dishes: Vec<Dish> = self
            .base
            .db()
            .query("SELECT * FROM dish ORDER BY display_order")
            .await?
            .take(0)?;
        Ok(dishes)
    }

    /// Find available dishes, ordered by display_order
    pub async fn find_available(&self) -> RepoResult<Vec<Dish>> {
        let dishes: Vec<Dish> = self
            .base
            .db()
            .query("SELECT * FROM dish WHERE available = true ORDER BY display_order")
            .await?
            .take(0)?;
        Ok(dishes)
    }

    /// Find dish by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Dish>> {
        let key = record_key(TABLE, id);
        let dish: Option<Dish> = self.base.db().select((TABLE, key)).await?;
        Ok(dish)
    }

    /// Create a new dish
    pub async fn create(&self, data: DishCreate) -> RepoResult<Dish> {
        let category = match data.category.as_deref() {
            Some(id) => {
                let canonical = canonical_category(id);
                self.ensure_category_exists(&canonical).await?;
                CategoryRef::Id(
                    canonical
                        .parse::<RecordId>()
                        .map_err(|_| RepoError::Validation(format!("Invalid category id: {id}")))?,
                )
            }
            None => CategoryRef::None,
        };

        let dish = Dish {
            id: None,
            name: data.name,
            description: data.description,
            category,
            price: data.price,
            compare_at_price: normalize_compare_at_price(data.compare_at_price),
            images: data.images,
            dietary_info: data.dietary_info,
            allergens: data.allergens,
            spice_level: clamp_spice_level(data.spice_level),
            badges: data.badges,
            search_tags: data.search_tags,
            display_order: data.display_order,
            available: data.available,
        };

        let created: Option<Dish> = self.base.db().create(TABLE).content(dish).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create dish".to_string()))
    }

    /// Update a dish
    pub async fn update(&self, id: &str, data: DishUpdate) -> RepoResult<Dish> {
        let key = record_key(TABLE, id);
        if self.find_by_id(key).await?.is_none() {
            return Err(RepoError::NotFound(format!("Dish {} not found", id)));
        }

        let category = match data.category {
            Some(Some(ref cat_id)) => {
                let canonical = canonical_category(cat_id);
                self.ensure_category_exists(&canonical).await?;
                Some(Some(canonical))
            }
            Some(None) => Some(None),
            None => None,
        };

        let merge = DishUpdateDb {
            name: data.name,
            description: data.description,
            category,
            price: data.price,
            compare_at_price: data
                .compare_at_price
                .map(normalize_compare_at_price),
            images: data.images,
            dietary_info: data.dietary_info,
            allergens: data.allergens,
            spice_level: data.spice_level.map(clamp_spice_level),
            badges: data.badges,
            search_tags: data.search_tags,
            display_order: data.display_order,
            available: data.available,
        };

        let thing = RecordId::from_table_key(TABLE, key);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", merge))
            .await?;

        self.find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Dish {} not found", id)))
    }

    /// Hard delete a dish
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let key = record_key(TABLE, id);
        if self.find_by_id(key).await?.is_none() {
            return Err(RepoError::NotFound(format!("Dish {} not found", id)));
        }
        let _: Option<Dish> = self.base.db().delete((TABLE, key)).await?;
        Ok(true)
    }

    async fn ensure_category_exists(&self, canonical: &str) -> RepoResult<()> {
        let key = record_key(CATEGORY_TABLE, canonical);
        let category: Option<Category> =
            self.base.db().select((CATEGORY_TABLE, key)).await?;
        if category.is_none() {
            return Err(RepoError::Validation(format!(
                "Category {} does not exist",
                canonical
            )));
        }
        Ok(())
    }
}
