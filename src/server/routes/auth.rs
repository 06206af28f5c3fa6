//! Login endpoint.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::user::User;
use crate::server::{ApiError, AppState};
use crate::services::auth::authenticate;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
///
/// Accepts a username or email in the `username` field and returns a signed
/// token plus the account snapshot.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = {
        let db = state.db()?;
        authenticate(db.connection(), &body.username, &body.password)?
    };

    let token = state.tokens().issue(&user)?;
    log::info!("User '{}' logged in", user.username);

    Ok(Json(LoginResponse { token, user }))
}
