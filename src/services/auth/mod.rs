//! Authentication: credential verification and signed session tokens.
//!
//! Login accepts a username or an email (an `@` in the identifier selects the
//! email column). Tokens are HS256 JWTs embedding the user snapshot the
//! client needs for permission checks, valid for 24 hours by default.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::models::permission::{can_perform, Action};
use crate::models::user::{Role, User};

/// Token validity window in hours.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (standard JWT `sub` claim).
    pub sub: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub can_edit: bool,
    pub can_add: bool,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn can_perform(&self, action: Action) -> bool {
        can_perform(self.role, self.can_edit, self.can_add, action)
    }
}

/// Errors surfaced by login and token verification.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Username/Email and password are required")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_hours: i64,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, TOKEN_TTL_HOURS)
    }

    pub fn with_ttl(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_hours,
        }
    }

    /// Sign a token for the given user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let id = user
            .id
            .ok_or_else(|| anyhow::anyhow!("User id is required to issue a token"))?;

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            can_edit: user.can_edit,
            can_add: user.can_add,
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    /// Verify a token's signature and expiry and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Verify credentials against the users table.
///
/// Returns the account without its password hash. Unknown identifiers and
/// wrong passwords produce the same `InvalidCredentials` error.
pub fn authenticate(
    conn: &Connection,
    username_or_email: &str,
    password: &str,
) -> Result<User, AuthError> {
    if username_or_email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let column = if username_or_email.contains('@') {
        "email"
    } else {
        "username"
    };
    let query = format!(
        "SELECT id, username, email, name, role, can_edit, can_add, password_hash
         FROM users WHERE {} = ?1",
        column
    );

    let row = conn.query_row(&query, [username_or_email], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, i64>(5)?,
            row.get::<_, i64>(6)?,
            row.get::<_, String>(7)?,
        ))
    });

    let (id, username, email, name, role, can_edit, can_add, hash) = match row {
        Ok(values) => values,
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(AuthError::InvalidCredentials),
        Err(e) => return Err(AuthError::Internal(e.into())),
    };

    let valid = bcrypt::verify(password, &hash)
        .context("Failed to verify password hash")
        .map_err(AuthError::Internal)?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    let role = Role::parse(&role).ok_or_else(|| {
        AuthError::Internal(anyhow::anyhow!("Unknown role '{}' for user {}", role, id))
    })?;

    Ok(User {
        id: Some(id),
        username,
        email,
        name,
        role,
        can_edit: can_edit != 0,
        can_add: can_add != 0,
        created_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database::schema::{
        SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD, SEED_ADMIN_USERNAME,
    };
    use crate::services::database::Database;

    fn seeded_db() -> Database {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db
    }

    fn sample_user() -> User {
        let mut user = User::new("alice", "alice@example.com", "Alice");
        user.id = Some(7);
        user.role = Role::Admin;
        user.can_edit = true;
        user
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue(&sample_user()).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.can_edit);
        assert!(!claims.can_add);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_HOURS * 3600);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = TokenService::new("secret-a").issue(&sample_user()).unwrap();
        let result = TokenService::new("secret-b").verify(&token);
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let tokens = TokenService::new("test-secret");
        assert!(matches!(
            tokens.verify("not.a.token"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_issue_requires_id() {
        let tokens = TokenService::new("test-secret");
        let user = User::new("noid", "noid@example.com", "No Id");
        assert!(tokens.issue(&user).is_err());
    }

    #[test]
    fn test_claims_permission_wrapper() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue(&sample_user()).unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert!(claims.can_perform(Action::ManageCategories));
        assert!(!claims.can_perform(Action::ManageUsers));
    }

    #[test]
    fn test_authenticate_by_username() {
        let db = seeded_db();
        let user =
            authenticate(db.connection(), SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD).unwrap();
        assert_eq!(user.role, Role::SuperAdmin);
        assert_eq!(user.email, SEED_ADMIN_EMAIL);
    }

    #[test]
    fn test_authenticate_by_email() {
        let db = seeded_db();
        let user = authenticate(db.connection(), SEED_ADMIN_EMAIL, SEED_ADMIN_PASSWORD).unwrap();
        assert_eq!(user.username, SEED_ADMIN_USERNAME);
    }

    #[test]
    fn test_authenticate_wrong_password() {
        let db = seeded_db();
        let result = authenticate(db.connection(), SEED_ADMIN_USERNAME, "wrong");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_unknown_user() {
        let db = seeded_db();
        let result = authenticate(db.connection(), "nobody", "whatever");
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_missing_fields() {
        let db = seeded_db();
        assert!(matches!(
            authenticate(db.connection(), "", "pw"),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            authenticate(db.connection(), "user", ""),
            Err(AuthError::MissingCredentials)
        ));
    }
}
