//! Client-side building blocks: the API client, session persistence, auth
//! state, the calendar store, and the month-grid layout math.

pub mod api;
pub mod auth;
pub mod grid;
pub mod reschedule;
pub mod session;
pub mod store;

pub use api::{ApiClient, ApiClientError};
pub use auth::AuthService;
pub use session::{Session, SessionStore};
pub use store::CalendarStore;
