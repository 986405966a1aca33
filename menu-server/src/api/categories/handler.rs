//! Category API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;

use crate::auth::AdminSession;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::utils::validation::{MAX_NAME_LEN, validate_localized_text, validate_slug};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Include inactive categories (admin sessions only)
    #[serde(default)]
    pub all: bool,
}

/// GET /api/categories - active categories in menu order
///
/// `?all=true` widens the listing to inactive categories, but only for
/// callers holding an admin session; anonymous callers always get the
/// active set.
pub async fn list(
    State(state): State<ServerState>,
    session: Option<Extension<AdminSession>>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = state.categories();
    let categories = if params.all && session.is_some() {
        repo.find_all().await?
    } else {
        repo.find_active().await?
    };
    Ok(Json(categories))
}

/// GET /api/categories/:id - single category
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let category = state
        .categories()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories - create category
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_localized_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_slug(&payload.slug)?;

    let category = state.categories().create(payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/:id - update category
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(ref name) = payload.name {
        validate_localized_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(ref slug) = payload.slug {
        validate_slug(slug)?;
    }

    let category = state.categories().update(&id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - delete category
///
/// Fails with a validation error while dishes still reference it.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let result = state.categories().delete(&id).await?;
    Ok(Json(result))
}
