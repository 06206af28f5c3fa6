//! User management endpoints.
//!
//! Every route here is gated to the admin tier. Deleting a super_admin is
//! refused one layer down, in the user service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::models::user::{NewUser, Role, User, UserPatch};
use crate::server::{ApiError, AppState, CurrentUser};
use crate::services::user::UserService;

#[derive(Debug, Deserialize)]
pub struct NewUserBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_add: bool,
}

fn require_admin(claims: &crate::services::auth::Claims) -> Result<(), ApiError> {
    if claims.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::access_denied())
    }
}

/// GET /api/users
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(&claims)?;

    let db = state.db()?;
    let users = UserService::new(db.connection()).list()?;
    Ok(Json(users))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(body): Json<NewUserBody>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require_admin(&claims)?;

    let (username, email, password, name) =
        match (body.username, body.email, body.password, body.name) {
            (Some(username), Some(email), Some(password), Some(name)) => {
                (username, email, password, name)
            }
            _ => {
                return Err(ApiError::Validation(
                    "Username, email, password, and name are required".to_string(),
                ))
            }
        };

    let new_user = NewUser {
        username,
        email,
        password,
        name,
        role: body.role,
        can_edit: body.can_edit,
        can_add: body.can_add,
    };

    let db = state.db()?;
    let user = UserService::new(db.connection()).create(new_user)?;
    log::info!("User '{}' created by '{}'", user.username, claims.username);
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, ApiError> {
    require_admin(&claims)?;

    let db = state.db()?;
    let user = UserService::new(db.connection()).update(id, patch)?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(&claims)?;

    let db = state.db()?;
    UserService::new(db.connection()).delete(id)?;
    log::info!("User {} deleted by '{}'", id, claims.username);
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
