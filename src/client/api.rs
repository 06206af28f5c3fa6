//! HTTP client for the REST API.
//!
//! Thin blocking wrapper over reqwest. Every call except login sends the
//! session token as a bearer header; error bodies are unwrapped into
//! [`ApiClientError::Api`] with the server's message and status.

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::models::category::{Category, CategoryPatch};
use crate::models::event::{Event, EventPatch};
use crate::models::user::{NewUser, User, UserPatch};

/// Errors surfaced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ApiClientError {
    /// True for 401/403 responses, which mean the session is no longer valid.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ApiClientError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED.as_u16()
                    || *status == StatusCode::FORBIDDEN.as_u16()
        )
    }
}

/// Login response: token plus the account snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[allow(dead_code)]
    message: String,
}

/// Blocking client for the calendar API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // --- auth ---

    pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()?;
        parse(response)
    }

    // --- categories ---

    pub fn list_categories(&self) -> Result<Vec<Category>, ApiClientError> {
        let response = self.authed(self.http.get(self.url("/api/categories"))).send()?;
        parse(response)
    }

    pub fn create_category(&self, name: &str, color: &str) -> Result<Category, ApiClientError> {
        let response = self
            .authed(self.http.post(self.url("/api/categories")))
            .json(&json!({ "name": name, "color": color }))
            .send()?;
        parse(response)
    }

    pub fn update_category(
        &self,
        id: i64,
        patch: &CategoryPatch,
    ) -> Result<Category, ApiClientError> {
        let response = self
            .authed(self.http.put(self.url(&format!("/api/categories/{}", id))))
            .json(patch)
            .send()?;
        parse(response)
    }

    pub fn delete_category(&self, id: i64) -> Result<(), ApiClientError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/api/categories/{}", id))))
            .send()?;
        parse::<MessageBody>(response).map(|_| ())
    }

    // --- events ---

    pub fn list_events(&self) -> Result<Vec<Event>, ApiClientError> {
        let response = self.authed(self.http.get(self.url("/api/events"))).send()?;
        parse(response)
    }

    pub fn create_event(&self, event: &Event) -> Result<Event, ApiClientError> {
        let response = self
            .authed(self.http.post(self.url("/api/events")))
            .json(event)
            .send()?;
        parse(response)
    }

    pub fn update_event(&self, id: i64, patch: &EventPatch) -> Result<Event, ApiClientError> {
        let response = self
            .authed(self.http.put(self.url(&format!("/api/events/{}", id))))
            .json(patch)
            .send()?;
        parse(response)
    }

    pub fn delete_event(&self, id: i64) -> Result<(), ApiClientError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/api/events/{}", id))))
            .send()?;
        parse::<MessageBody>(response).map(|_| ())
    }

    // --- users ---

    pub fn list_users(&self) -> Result<Vec<User>, ApiClientError> {
        let response = self.authed(self.http.get(self.url("/api/users"))).send()?;
        parse(response)
    }

    pub fn create_user(&self, new_user: &NewUser) -> Result<User, ApiClientError> {
        let response = self
            .authed(self.http.post(self.url("/api/users")))
            .json(new_user)
            .send()?;
        parse(response)
    }

    pub fn update_user(&self, id: i64, patch: &UserPatch) -> Result<User, ApiClientError> {
        let response = self
            .authed(self.http.put(self.url(&format!("/api/users/{}", id))))
            .json(patch)
            .send()?;
        parse(response)
    }

    pub fn delete_user(&self, id: i64) -> Result<(), ApiClientError> {
        let response = self
            .authed(self.http.delete(self.url(&format!("/api/users/{}", id))))
            .send()?;
        parse::<MessageBody>(response).map(|_| ())
    }
}

/// Unwrap a response, turning error bodies into [`ApiClientError::Api`].
fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let message = response
        .json::<ErrorBody>()
        .map(|body| body.error)
        .unwrap_or_else(|_| status.to_string());

    Err(ApiClientError::Api {
        status: status.as_u16(),
        message,
    })
}
