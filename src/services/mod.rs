// Service module exports

pub mod auth;
pub mod category;
pub mod database;
pub mod event;
pub mod export;
pub mod user;
