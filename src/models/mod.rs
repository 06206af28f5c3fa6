// Module exports for models

pub mod category;
pub mod event;
pub mod permission;
pub mod user;
