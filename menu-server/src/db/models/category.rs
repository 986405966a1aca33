//! Category data model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::localized::LocalizedText;
use super::serde_helpers::{bool_true, option_record_id};

/// Menu category record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(
        with = "option_record_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<RecordId>,
    pub name: LocalizedText,
    /// URL-safe identifier, unique per category
    pub slug: String,
    /// Position in the customer-facing menu, ascending
    #[serde(default)]
    pub order: i32,
    /// Inactive categories are hidden from customers but kept for admin
    #[serde(default = "default_true", deserialize_with = "bool_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Category {
    /// Canonical string form of the category id ("category:slug"), if persisted.
    pub fn canonical_id(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_string())
    }
}

/// Payload for creating a category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: LocalizedText,
    pub slug: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Payload for partially updating a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
