//! Customer menu filter pipeline
//!
//! Stages always run in the same order: category, dietary flags, spice
//! levels, fuzzy search, then ordering. Every stage only removes dishes,
//! so an empty filter set passes everything through.

use std::collections::{HashMap, HashSet};

use crate::db::models::{Category, Dish, Locale};
use crate::menu::fuzzy::FuzzyMatcher;

/// Which category the customer is browsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategorySelection {
    #[default]
    All,
    /// Canonical id string "category:slug"
    Specific(String),
}

impl CategorySelection {
    /// Parse the query parameter form: absent or "all" means everything.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("") | Some("all") => CategorySelection::All,
            Some(id) => {
                let id = id.strip_prefix("category:").unwrap_or(id);
                CategorySelection::Specific(format!("category:{id}"))
            }
        }
    }
}

/// Dietary requirements, ANDed together
#[derive(Debug, Clone, Copy, Default)]
pub struct DietaryFilters {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub halal: bool,
}

impl DietaryFilters {
    fn accepts(&self, dish: &Dish) -> bool {
        let d = &dish.dietary_info;
        (!self.vegetarian || d.vegetarian)
            && (!self.vegan || d.vegan)
            && (!self.gluten_free || d.gluten_free)
            && (!self.dairy_free || d.dairy_free)
            && (!self.halal || d.halal)
    }
}

/// Everything the customer asked for in one request
#[derive(Debug, Clone, Default)]
pub struct MenuQuery {
    pub category: CategorySelection,
    pub dietary: DietaryFilters,
    /// Empty set means no spice filtering at all
    pub spice_levels: HashSet<u8>,
    pub search: Option<String>,
    pub locale: Locale,
}

/// Run the full filter pipeline over the available dishes.
///
/// `categories` supplies the menu ordering for the "all" view; dishes
/// whose category is unknown or inactive sort after every known
/// category. Within equal sort keys the incoming dish order is kept.
pub fn compute_menu(
    mut dishes: Vec<Dish>,
    categories: &[Category],
    query: &MenuQuery,
    fuzzy: &FuzzyMatcher,
) -> Vec<Dish> {
    // category
    if let CategorySelection::Specific(ref wanted) = query.category {
        dishes.retain(|d| d.category.resolved_id().as_deref() == Some(wanted));
    }

    // dietary flags, ANDed
    dishes.retain(|d| query.dietary.accepts(d));

    // spice levels, set membership
    if !query.spice_levels.is_empty() {
        dishes.retain(|d| query.spice_levels.contains(&d.spice_level));
    }

    // fuzzy search, every term must land somewhere
    if let Some(ref search) = query.search {
        let terms: Vec<&str> = search.split_whitespace().collect();
        if !terms.is_empty() {
            dishes.retain(|d| {
                terms
                    .iter()
                    .all(|term| dish_matches_term(d, term, query.locale, fuzzy))
            });
        }
    }

    // ordering
    match query.category {
        CategorySelection::All => {
            let rank: HashMap<String, i64> = categories
                .iter()
                .filter_map(|c| c.canonical_id().map(|id| (id, i64::from(c.order))))
                .collect();
            dishes.sort_by_key(|d| {
                let cat_rank = d
                    .category
                    .resolved_id()
                    .and_then(|id| rank.get(&id).copied())
                    .unwrap_or(i64::MAX);
                (cat_rank, d.display_order)
            });
        }
        CategorySelection::Specific(_) => {
            dishes.sort_by_key(|d| d.display_order);
        }
    }

    dishes
}

fn dish_matches_term(dish: &Dish, term: &str, locale: Locale, fuzzy: &FuzzyMatcher) -> bool {
    fuzzy.is_match(term, dish.name.get(locale))
        || fuzzy.is_match(term, dish.description.get(locale))
        || dish.search_tags.iter().any(|tag| fuzzy.is_match(term, tag))
}
