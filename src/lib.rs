//! Auntrack: a category-row calendar for tracking scheduled events.
//!
//! The crate is split into the shared data model, the SQLite-backed
//! services, the REST server, and the client-side state used by front ends.

pub mod client;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
