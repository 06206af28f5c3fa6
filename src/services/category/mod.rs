//! Category service for CRUD operations on event categories.
//!
//! Deleting a category relies on the `ON DELETE CASCADE` foreign key to
//! remove its events; this service never touches the events table itself.

use anyhow::Context;
use rusqlite::{params, Connection, Row};

use crate::models::category::{Category, CategoryPatch, CategoryValidationError};

/// Errors surfaced by category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error(transparent)]
    Validation(#[from] CategoryValidationError),
    #[error("Category name already exists")]
    DuplicateName,
    #[error("Category not found")]
    NotFound,
    #[error("At least name or color must be provided")]
    EmptyPatch,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Service for managing event categories.
pub struct CategoryService<'a> {
    conn: &'a Connection,
}

impl<'a> CategoryService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All categories ordered by name.
    pub fn list(&self) -> Result<Vec<Category>, CategoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM categories ORDER BY name")
            .context("Failed to prepare category list query")?;

        let categories = stmt
            .query_map([], row_to_category)
            .context("Failed to query categories")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read category rows")?;

        Ok(categories)
    }

    pub fn get(&self, id: i64) -> Result<Option<Category>, CategoryError> {
        let result = self.conn.query_row(
            "SELECT id, name, color FROM categories WHERE id = ?1",
            [id],
            row_to_category,
        );

        match result {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CategoryError::Internal(e.into())),
        }
    }

    pub fn create(&self, category: Category) -> Result<Category, CategoryError> {
        category.validate()?;

        let result = self.conn.execute(
            "INSERT INTO categories (name, color) VALUES (?1, ?2)",
            params![category.name.trim(), category.color],
        );
        map_constraint(result)?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(CategoryError::NotFound)
    }

    /// Update name and/or color. An all-empty patch is rejected before any
    /// database work.
    pub fn update(&self, id: i64, patch: CategoryPatch) -> Result<Category, CategoryError> {
        if patch.is_empty() {
            return Err(CategoryError::EmptyPatch);
        }

        let current = self.get(id)?.ok_or(CategoryError::NotFound)?;
        let updated = Category {
            id: Some(id),
            name: patch.name.unwrap_or(current.name),
            color: patch.color.unwrap_or(current.color),
            created_at: current.created_at,
        };
        updated.validate()?;

        let result = self.conn.execute(
            "UPDATE categories SET name = ?1, color = ?2 WHERE id = ?3",
            params![updated.name.trim(), updated.color, id],
        );
        map_constraint(result)?;

        self.get(id)?.ok_or(CategoryError::NotFound)
    }

    /// Delete a category; its events go with it via the cascade.
    pub fn delete(&self, id: i64) -> Result<(), CategoryError> {
        let rows = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1", [id])
            .context("Failed to delete category")?;

        if rows == 0 {
            return Err(CategoryError::NotFound);
        }

        Ok(())
    }
}

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        color: row.get(2)?,
        created_at: None,
    })
}

fn map_constraint(result: rusqlite::Result<usize>) -> Result<usize, CategoryError> {
    match result {
        Ok(rows) => Ok(rows),
        Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(CategoryError::DuplicateName)
        }
        Err(e) => Err(CategoryError::Internal(
            anyhow::Error::from(e).context("Category write failed"),
        )),
    }
}
