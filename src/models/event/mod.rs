//! Calendar event model.
//!
//! An event belongs to exactly one category and occupies the closed interval
//! `[start, end]`. The color is a denormalized copy of the category color
//! taken at creation time. Wire field names follow the REST contract
//! (`start_date` / `end_date`).

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::category::is_valid_hex_color;

/// A calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    pub title: String,
    pub category_id: i64,
    /// Category name joined in by the API; absent on outbound create bodies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(rename = "start_date")]
    pub start: DateTime<Local>,
    #[serde(rename = "end_date")]
    pub end: DateTime<Local>,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
}

impl Event {
    /// Create a new event with required fields.
    pub fn new(
        title: impl Into<String>,
        category_id: i64,
        start: DateTime<Local>,
        end: DateTime<Local>,
        color: impl Into<String>,
    ) -> Result<Self, EventValidationError> {
        let event = Self {
            id: None,
            title: title.into(),
            category_id,
            category_name: None,
            start,
            end,
            color: color.into(),
            description: None,
            created_at: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Validate the event.
    ///
    /// Equal start and end instants are legal: a zero-duration event renders
    /// as a single-day bar.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.trim().is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.end < self.start {
            return Err(EventValidationError::EndBeforeStart);
        }
        if !is_valid_hex_color(&self.color) {
            return Err(EventValidationError::InvalidColor);
        }
        Ok(())
    }

    /// Wall-clock duration.
    pub fn duration(&self) -> chrono::Duration {
        self.end - self.start
    }

    /// Number of whole calendar days between the start day and the end day.
    /// Zero for a same-day event.
    pub fn duration_days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }
}

/// Validation errors for Event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event end date must not be before start date")]
    EndBeforeStart,
    #[error("Color must be in hex format (#RRGGBB or #RGB)")]
    InvalidColor,
}

/// Partial update for an event; only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, rename = "start_date", skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Local>>,
    #[serde(default, rename = "end_date", skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EventPatch {
    /// Patch that moves an event to a new interval, leaving the rest alone.
    pub fn reschedule(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the patch on top of an existing event, returning the merged copy.
    pub fn apply_to(&self, event: &Event) -> Event {
        let mut merged = event.clone();
        if let Some(ref title) = self.title {
            merged.title = title.clone();
        }
        if let Some(category_id) = self.category_id {
            merged.category_id = category_id;
        }
        if let Some(start) = self.start {
            merged.start = start;
        }
        if let Some(end) = self.end {
            merged.end = end;
        }
        if let Some(ref color) = self.color {
            merged.color = color.clone();
        }
        if let Some(ref description) = self.description {
            merged.description = Some(description.clone());
        }
        merged
    }
}
