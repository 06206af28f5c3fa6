//! User account model.
//!
//! A user carries a coarse role tier plus two independent capability flags
//! (`can_edit`, `can_add`) that grant event mutations to an otherwise plain
//! user. Role and flags are deliberately orthogonal.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Permission tier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Wire/database representation (`user`, `admin`, `super_admin`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "super_admin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }

    /// Admin and super_admin both clear the admin bar.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account as returned by the API (never carries the password hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub can_edit: bool,
    pub can_add: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            name: name.into(),
            role: Role::User,
            can_edit: false,
            can_add: false,
            created_at: None,
        }
    }

    /// Validate the account fields.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if !self.email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        Ok(())
    }
}

/// Payload for creating an account. The plaintext password is hashed by the
/// user service and never stored or echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub can_edit: bool,
    #[serde(default)]
    pub can_add: bool,
}

/// Partial update for an account; only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_add: Option<bool>,
}

/// Validation errors for User.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("Username cannot be empty")]
    EmptyUsername,
    #[error("Email must contain '@'")]
    InvalidEmail,
    #[error("Name cannot be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(json, "\"super_admin\"");
        let back: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Role::SuperAdmin);
    }

    #[test]
    fn test_is_admin() {
        assert!(!Role::User.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("alice", "alice@example.com", "Alice");
        assert_eq!(user.role, Role::User);
        assert!(!user.can_edit);
        assert!(!user.can_add);
        assert!(user.id.is_none());
    }

    #[test]
    fn test_validate_empty_username() {
        let user = User::new("  ", "alice@example.com", "Alice");
        assert_eq!(user.validate(), Err(UserValidationError::EmptyUsername));
    }

    #[test]
    fn test_validate_bad_email() {
        let user = User::new("alice", "not-an-email", "Alice");
        assert_eq!(user.validate(), Err(UserValidationError::InvalidEmail));
    }

    #[test]
    fn test_validate_ok() {
        let user = User::new("alice", "alice@example.com", "Alice");
        assert!(user.validate().is_ok());
    }
}
