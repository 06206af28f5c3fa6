//! Event endpoints.
//!
//! Reads need only a valid token. Creation requires the add permission,
//! updates the edit permission, deletion the delete permission; admins pass
//! all three regardless of their per-account flags.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::json;

use crate::models::event::{Event, EventPatch};
use crate::models::permission::Action;
use crate::server::{ApiError, AppState, CurrentUser};
use crate::services::event::EventService;

#[derive(Debug, Deserialize)]
pub struct NewEventBody {
    pub title: Option<String>,
    pub category_id: Option<i64>,
    pub start_date: Option<DateTime<Local>>,
    pub end_date: Option<DateTime<Local>>,
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// GET /api/events
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(_claims): CurrentUser,
) -> Result<Json<Vec<Event>>, ApiError> {
    let db = state.db()?;
    let events = EventService::new(db.connection()).list()?;
    Ok(Json(events))
}

/// POST /api/events
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(body): Json<NewEventBody>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    if !claims.can_perform(Action::AddEvent) {
        return Err(ApiError::access_denied());
    }

    let (title, category_id, start, end, color) = match (
        body.title,
        body.category_id,
        body.start_date,
        body.end_date,
        body.color,
    ) {
        (Some(title), Some(category_id), Some(start), Some(end), Some(color)) => {
            (title, category_id, start, end, color)
        }
        _ => {
            return Err(ApiError::Validation(
                "Title, category, dates, and color are required".to_string(),
            ))
        }
    };

    let event = Event {
        id: None,
        title,
        category_id,
        category_name: None,
        start,
        end,
        color,
        description: body.description,
        created_at: None,
    };

    let db = state.db()?;
    let created = EventService::new(db.connection()).create(event)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/events/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    if !claims.can_perform(Action::EditEvent) {
        return Err(ApiError::access_denied());
    }

    let db = state.db()?;
    let event = EventService::new(db.connection()).update(id, patch)?;
    Ok(Json(event))
}

/// DELETE /api/events/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !claims.can_perform(Action::DeleteEvent) {
        return Err(ApiError::access_denied());
    }

    let db = state.db()?;
    EventService::new(db.connection()).delete(id)?;
    Ok(Json(json!({ "message": "Event deleted successfully" })))
}
