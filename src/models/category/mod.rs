//! Category model for organizing events.
//!
//! Categories are the rows of the month grid. Each owns zero or more events;
//! deleting a category cascades to its events at the persistence layer.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// A category row with a unique name and display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (database primary key)
    pub id: Option<i64>,
    /// Display name of the category (must be unique)
    pub name: String,
    /// Hex color code for the category (e.g., "#fb923c")
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
}

impl Category {
    /// Create a new category with the given name and color.
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: color.into(),
            created_at: None,
        }
    }

    /// Validate the category data.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        if name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong);
        }

        if !is_valid_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor);
        }

        Ok(())
    }
}

/// Partial update for a category; at least one field must be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.color.is_none()
    }
}

/// Validation errors for Category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CategoryValidationError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name must be 50 characters or less")]
    NameTooLong,
    #[error("Invalid color format (use hex like #FF0000)")]
    InvalidColor,
}

/// Check if a string is a valid hex color code.
pub fn is_valid_hex_color(color: &str) -> bool {
    let color = color.trim();
    if !color.starts_with('#') {
        return false;
    }
    let hex = &color[1..];
    // Accept 3, 6, or 8 character hex codes
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Starter categories created on first boot if the table is empty.
pub fn starter_categories() -> Vec<Category> {
    vec![
        Category::new("HR Events", "#fb923c"),
        Category::new("Automotive", "#facc15"),
    ]
}
