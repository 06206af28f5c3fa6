// Database service module
// SQLite connection, schema management and first-boot seeding

mod connection;
pub mod migrations;
pub mod schema;

pub use connection::Database;
