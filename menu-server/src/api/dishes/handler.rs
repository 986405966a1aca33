//! Dish API Handlers
//!
//! Admin responses expand each dish's category to the full object so
//! the admin UI never has to join ids itself.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;

use crate::core::ServerState;
use crate::db::models::{CategoryRef, Dish, DishCreate, DishImage, DishUpdate, LocalizedText};
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, MAX_TAG_LEN, MAX_URL_LEN, validate_localized_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// Swap id references for the full category objects.
async fn expand_categories(state: &ServerState, dishes: &mut [Dish]) -> AppResult<()> {
    let categories = state.categories().find_all().await?;
    let by_id: HashMap<String, _> = categories
        .into_iter()
        .filter_map(|c| c.canonical_id().map(|id| (id, c)))
        .collect();

    for dish in dishes {
        if let Some(id) = dish.category.resolved_id()
            && let Some(category) = by_id.get(&id)
        {
            dish.category = CategoryRef::Full(Box::new(category.clone()));
        }
    }
    Ok(())
}

fn validate_price(price: Decimal) -> AppResult<()> {
    if price.is_sign_negative() {
        return Err(AppError::validation("price must not be negative"));
    }
    Ok(())
}

fn validate_dish_fields(
    name: Option<&LocalizedText>,
    description: Option<&LocalizedText>,
    images: Option<&[DishImage]>,
    tags: Option<&[String]>,
) -> AppResult<()> {
    if let Some(name) = name {
        validate_localized_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(description) = description {
        validate_localized_text(description, "description", MAX_DESCRIPTION_LEN)?;
    }
    if let Some(images) = images {
        for image in images {
            validate_required_text(&image.url, "image url", MAX_URL_LEN)?;
        }
    }
    if let Some(tags) = tags {
        for tag in tags {
            validate_required_text(tag, "search tag", MAX_TAG_LEN)?;
        }
    }
    Ok(())
}

/// GET /api/dishes - all dishes with categories expanded
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Dish>>> {
    let mut dishes = state.dishes().find_all().await?;
    expand_categories(&state, &mut dishes).await?;
    Ok(Json(dishes))
}

/// GET /api/dishes/:id - single dish with category expanded
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Dish>> {
    let dish = state
        .dishes()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Dish {} not found", id)))?;
    let mut dishes = vec![dish];
    expand_categories(&state, &mut dishes).await?;
    Ok(Json(dishes.remove(0)))
}

/// POST /api/dishes - create dish
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DishCreate>,
) -> AppResult<Json<Dish>> {
    validate_dish_fields(
        Some(&payload.name),
        Some(&payload.description),
        Some(&payload.images),
        Some(&payload.search_tags),
    )?;
    validate_price(payload.price)?;

    let dish = state.dishes().create(payload).await?;
    let mut dishes = vec![dish];
    expand_categories(&state, &mut dishes).await?;
    Ok(Json(dishes.remove(0)))
}

/// PUT /api/dishes/:id - update dish
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DishUpdate>,
) -> AppResult<Json<Dish>> {
    validate_dish_fields(
        payload.name.as_ref(),
        payload.description.as_ref(),
        payload.images.as_deref(),
        payload.search_tags.as_deref(),
    )?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let dish = state.dishes().update(&id, payload).await?;
    let mut dishes = vec![dish];
    expand_categories(&state, &mut dishes).await?;
    Ok(Json(dishes.remove(0)))
}

/// DELETE /api/dishes/:id - delete dish
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.dishes().delete(&id).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_must_cover_both_languages() {
        let name = LocalizedText::new("Chamuças", "Samosas");
        let full = LocalizedText::new("Texto", "Text");
        let empty = LocalizedText::default();
        let partial = LocalizedText::new("Texto", "");

        assert!(validate_dish_fields(Some(&name), Some(&full), None, None).is_ok());
        assert!(validate_dish_fields(Some(&name), Some(&empty), None, None).is_err());
        assert!(validate_dish_fields(Some(&name), Some(&partial), None, None).is_err());
    }
}
