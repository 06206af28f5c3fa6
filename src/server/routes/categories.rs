//! Category endpoints.
//!
//! Reads need only a valid token; mutations require the category management
//! permission (admin tier).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::models::category::{Category, CategoryPatch};
use crate::models::permission::Action;
use crate::server::{ApiError, AppState, CurrentUser};
use crate::services::category::CategoryService;

#[derive(Debug, Deserialize)]
pub struct NewCategoryBody {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// GET /api/categories
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let db = state.db()?;
    let categories = CategoryService::new(db.connection()).list()?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(body): Json<NewCategoryBody>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    if !claims.can_perform(Action::ManageCategories) {
        return Err(ApiError::access_denied());
    }

    let (name, color) = match (body.name, body.color) {
        (Some(name), Some(color)) => (name, color),
        _ => {
            return Err(ApiError::Validation(
                "Name and color are required".to_string(),
            ))
        }
    };

    let db = state.db()?;
    let category = CategoryService::new(db.connection()).create(Category::new(name, color))?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
    Json(patch): Json<CategoryPatch>,
) -> Result<Json<Category>, ApiError> {
    if !claims.can_perform(Action::ManageCategories) {
        return Err(ApiError::access_denied());
    }

    let db = state.db()?;
    let category = CategoryService::new(db.connection()).update(id, patch)?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id
///
/// Deleting a category also removes its events (cascade).
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !claims.can_perform(Action::ManageCategories) {
        return Err(ApiError::access_denied());
    }

    let db = state.db()?;
    CategoryService::new(db.connection()).delete(id)?;
    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
