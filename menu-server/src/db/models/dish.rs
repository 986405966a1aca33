//! Dish data model
//!
//! A dish's `category` is stored in the database as the canonical string
//! form "category:slug". API responses may carry it expanded to the full
//! category object, and legacy records may carry null. `CategoryRef`
//! round-trips all three shapes.

use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use surrealdb::RecordId;

use super::category::Category;
use super::localized::LocalizedText;
use super::serde_helpers::{bool_true, option_record_id};

/// Reference to a dish's category in one of its three wire shapes
#[derive(Debug, Clone, Default)]
pub enum CategoryRef {
    /// Uncategorized (null on the wire)
    #[default]
    None,
    /// Canonical id string "category:slug"
    Id(RecordId),
    /// Fully expanded category object
    Full(Box<Category>),
}

impl CategoryRef {
    /// The canonical id string, regardless of shape.
    pub fn resolved_id(&self) -> Option<String> {
        match self {
            CategoryRef::None => None,
            CategoryRef::Id(id) => Some(id.to_string()),
            CategoryRef::Full(cat) => cat.canonical_id(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CategoryRef::None)
    }
}

impl Serialize for CategoryRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CategoryRef::None => serializer.serialize_none(),
            CategoryRef::Id(id) => serializer.serialize_str(&id.to_string()),
            CategoryRef::Full(cat) => cat.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoryRefVisitor;

        impl<'de> Visitor<'de> for CategoryRefVisitor {
            type Value = CategoryRef;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("null, a category id string, or a category object")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(CategoryRef::None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(CategoryRef::None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(CategoryRefVisitor)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value.is_empty() {
                    return Ok(CategoryRef::None);
                }
                value
                    .parse::<RecordId>()
                    .map(CategoryRef::Id)
                    .map_err(|_| de::Error::custom(format!("invalid category id: {}", value)))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                // buffer the map, then decide which shape it is
                let mut obj = serde_json::Map::new();
                while let Some((key, value)) =
                    map.next_entry::<String, serde_json::Value>()?
                {
                    obj.insert(key, value);
                }
                let value = serde_json::Value::Object(obj.clone());
                if obj.contains_key("slug") || obj.contains_key("name") {
                    if let Ok(cat) = serde_json::from_value::<Category>(value) {
                        return Ok(CategoryRef::Full(Box::new(cat)));
                    }
                } else if let Ok(id) = serde_json::from_value::<RecordId>(value) {
                    return Ok(CategoryRef::Id(id));
                }
                // unknown shape, treat as uncategorized rather than failing
                Ok(CategoryRef::None)
            }
        }

        deserializer.deserialize_option(CategoryRefVisitor)
    }
}

/// Dietary flags; all default to false
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DietaryInfo {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub halal: bool,
}

/// Promotional badge shown on a dish card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeType {
    Popular,
    ChefSpecial,
    New,
}

/// Image attached to a dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishImage {
    pub url: String,
    /// Shown on the dish card; at most one per dish by convention
    #[serde(default)]
    pub is_primary: bool,
}

/// Spice levels run from 0 (none) to 4 (very hot)
pub const MAX_SPICE_LEVEL: u8 = 4;

/// Clamp an incoming spice level to the supported range.
pub fn clamp_spice_level(level: u8) -> u8 {
    level.min(MAX_SPICE_LEVEL)
}

/// Normalize a strike-through price: zero or negative means no promotion.
pub fn normalize_compare_at_price(price: Option<Decimal>) -> Option<Decimal> {
    price.filter(|p| p.is_sign_positive() && !p.is_zero())
}

/// Menu dish record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    #[serde(
        with = "option_record_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub category: CategoryRef,
    pub price: Decimal,
    /// Strike-through price for promotions; absent when not on offer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<DishImage>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub spice_level: u8,
    #[serde(default)]
    pub badges: Vec<BadgeType>,
    /// Extra terms matched by search but never shown
    #[serde(default)]
    pub search_tags: Vec<String>,
    /// Position within its category, ascending
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub available: bool,
}

fn default_true() -> bool {
    true
}

/// Payload for creating a dish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    /// Canonical id string "category:slug", or absent for uncategorized
    #[serde(default)]
    pub category: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<DishImage>,
    #[serde(default)]
    pub dietary_info: DietaryInfo,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub spice_level: u8,
    #[serde(default)]
    pub badges: Vec<BadgeType>,
    #[serde(default)]
    pub search_tags: Vec<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_true")]
    pub available: bool,
}

/// Payload for partially updating a dish
///
/// `category` and `compare_at_price` are double-optional: absent means
/// "leave unchanged", an explicit null clears the field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishUpdate {
    pub name: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    #[serde(default, with = "double_option")]
    pub category: Option<Option<String>>,
    pub price: Option<Decimal>,
    #[serde(default, with = "double_option")]
    pub compare_at_price: Option<Option<Decimal>>,
    pub images: Option<Vec<DishImage>>,
    pub dietary_info: Option<DietaryInfo>,
    pub allergens: Option<Vec<String>>,
    pub spice_level: Option<u8>,
    pub badges: Option<Vec<BadgeType>>,
    pub search_tags: Option<Vec<String>>,
    pub display_order: Option<i32>,
    pub available: Option<bool>,
}

/// Distinguishes a missing field from an explicit null in update payloads
mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(d).map(Some)
    }
}
