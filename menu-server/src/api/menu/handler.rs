//! Customer menu handler
//!
//! One endpoint runs the whole filter pipeline server-side and returns
//! the dishes already ordered for display, plus the active categories
//! for the filter bar.

use std::collections::HashSet;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Category, Dish, Locale};
use crate::menu::{CategorySelection, DietaryFilters, MenuQuery, compute_menu};
use crate::utils::AppResult;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MenuParams {
    /// Category id or slug; absent or "all" means every category
    pub category: Option<String>,
    pub search: Option<String>,
    pub locale: Option<String>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub halal: bool,
    /// Comma-separated spice levels, e.g. "0,2,4"
    pub spice_levels: Option<String>,
}

impl MenuParams {
    fn into_query(self, default_locale: Locale) -> MenuQuery {
        let spice_levels: HashSet<u8> = self
            .spice_levels
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();

        MenuQuery {
            category: CategorySelection::parse(self.category.as_deref()),
            dietary: DietaryFilters {
                vegetarian: self.vegetarian,
                vegan: self.vegan,
                gluten_free: self.gluten_free,
                dairy_free: self.dairy_free,
                halal: self.halal,
            },
            spice_levels,
            search: self.search.filter(|s| !s.trim().is_empty()),
            locale: self
                .locale
                .and_then(|l| l.parse().ok())
                .unwrap_or(default_locale),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub dishes: Vec<Dish>,
    pub categories: Vec<Category>,
}

/// GET /api/menu - the filtered customer menu
pub async fn get_menu(
    State(state): State<ServerState>,
    Query(params): Query<MenuParams>,
) -> AppResult<Json<MenuResponse>> {
    let query = params.into_query(state.config.default_locale);

    let dishes = state.dishes().find_available().await?;
    let categories = state.categories().find_active().await?;

    let dishes = compute_menu(dishes, &categories, &query, &state.fuzzy);

    Ok(Json(MenuResponse { dishes, categories }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_spice_levels_and_locale() {
        let params = MenuParams {
            spice_levels: Some("0, 2,junk,4".to_string()),
            locale: Some("en".to_string()),
            ..Default::default()
        };
        let query = params.into_query(Locale::Pt);
        assert_eq!(query.spice_levels, HashSet::from([0, 2, 4]));
        assert_eq!(query.locale, Locale::En);
    }

    #[test]
    fn blank_search_is_dropped() {
        let params = MenuParams {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        let query = params.into_query(Locale::Pt);
        assert!(query.search.is_none());
        assert_eq!(query.category, CategorySelection::All);
    }
}
