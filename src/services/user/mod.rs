//! User account service.
//!
//! CRUD over the users table. Passwords are bcrypt-hashed on the way in and
//! the hash never leaves this module. A super_admin row can never be deleted
//! through this service, regardless of the caller.

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDateTime};
use rusqlite::{params, Connection, Row};

use crate::models::user::{NewUser, Role, User, UserPatch, UserValidationError};

/// Errors surfaced by user management operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error(transparent)]
    Validation(#[from] UserValidationError),
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error("Username or email already exists")]
    Duplicate,
    #[error("User not found")]
    NotFound,
    #[error("Cannot delete super admin users")]
    SuperAdminProtected,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Service for managing user accounts.
pub struct UserService<'a> {
    conn: &'a Connection,
}

impl<'a> UserService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// List all accounts, newest first.
    pub fn list(&self) -> Result<Vec<User>, UserError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, username, email, name, role, can_edit, can_add, created_at
                 FROM users ORDER BY created_at DESC, id DESC",
            )
            .context("Failed to prepare user list query")?;

        let users = stmt
            .query_map([], row_to_user)
            .context("Failed to query users")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read user rows")?;

        Ok(users)
    }

    pub fn get(&self, id: i64) -> Result<Option<User>, UserError> {
        let result = self.conn.query_row(
            "SELECT id, username, email, name, role, can_edit, can_add, created_at
             FROM users WHERE id = ?1",
            [id],
            row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Internal(e.into())),
        }
    }

    /// Create an account, hashing the supplied password.
    pub fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        if new_user.password.is_empty() {
            return Err(UserError::EmptyPassword);
        }

        let role = new_user.role.unwrap_or(Role::User);
        let user = User {
            id: None,
            username: new_user.username,
            email: new_user.email,
            name: new_user.name,
            role,
            can_edit: new_user.can_edit,
            can_add: new_user.can_add,
            created_at: None,
        };
        user.validate()?;

        let password_hash = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
            .context("Failed to hash password")?;

        let result = self.conn.execute(
            "INSERT INTO users (username, email, password_hash, name, role, can_edit, can_add)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.username.trim(),
                user.email.trim(),
                password_hash,
                user.name.trim(),
                role.as_str(),
                user.can_edit as i64,
                user.can_add as i64,
            ],
        );

        map_constraint(result)?;

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(UserError::NotFound)
    }

    /// Apply a partial update, preserving unchanged fields.
    pub fn update(&self, id: i64, patch: UserPatch) -> Result<User, UserError> {
        let current = self.get(id)?.ok_or(UserError::NotFound)?;

        let updated = User {
            id: Some(id),
            username: patch.username.unwrap_or(current.username),
            email: patch.email.unwrap_or(current.email),
            name: patch.name.unwrap_or(current.name),
            role: patch.role.unwrap_or(current.role),
            can_edit: patch.can_edit.unwrap_or(current.can_edit),
            can_add: patch.can_add.unwrap_or(current.can_add),
            created_at: current.created_at,
        };
        updated.validate()?;

        let result = self.conn.execute(
            "UPDATE users SET username = ?1, email = ?2, name = ?3, role = ?4,
                              can_edit = ?5, can_add = ?6
             WHERE id = ?7",
            params![
                updated.username.trim(),
                updated.email.trim(),
                updated.name.trim(),
                updated.role.as_str(),
                updated.can_edit as i64,
                updated.can_add as i64,
                id,
            ],
        );
        map_constraint(result)?;

        // An empty password field means "keep the current password".
        if let Some(password) = patch.password.filter(|p| !p.is_empty()) {
            let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                .context("Failed to hash password")?;
            self.conn
                .execute(
                    "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                    params![password_hash, id],
                )
                .context("Failed to update password")?;
        }

        self.get(id)?.ok_or(UserError::NotFound)
    }

    /// Delete an account. Super_admin rows are protected unconditionally.
    pub fn delete(&self, id: i64) -> Result<(), UserError> {
        let target = self.get(id)?.ok_or(UserError::NotFound)?;
        if target.role == Role::SuperAdmin {
            return Err(UserError::SuperAdminProtected);
        }

        let rows = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", [id])
            .context("Failed to delete user")?;
        if rows == 0 {
            return Err(UserError::NotFound);
        }

        Ok(())
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(4)?;
    let role = Role::parse(&role_str).unwrap_or(Role::User);
    let created_at: Option<String> = row.get(7)?;
    Ok(User {
        id: Some(row.get(0)?),
        username: row.get(1)?,
        email: row.get(2)?,
        name: row.get(3)?,
        role,
        can_edit: row.get::<_, i64>(5)? != 0,
        can_add: row.get::<_, i64>(6)? != 0,
        created_at: created_at.as_deref().and_then(parse_sqlite_timestamp),
    })
}

/// Parses SQLite's `CURRENT_TIMESTAMP` format (UTC, second precision).
fn parse_sqlite_timestamp(value: &str) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc().with_timezone(&Local))
}

/// Translates a UNIQUE violation on username/email into [`UserError::Duplicate`].
fn map_constraint(result: rusqlite::Result<usize>) -> Result<usize, UserError> {
    match result {
        Ok(rows) => Ok(rows),
        Err(rusqlite::Error::SqliteFailure(e, msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            let _ = msg;
            Err(UserError::Duplicate)
        }
        Err(e) => Err(UserError::Internal(
            anyhow::Error::from(e).context("User write failed"),
        )),
    }
}
