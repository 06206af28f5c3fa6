use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::models::category::starter_categories;
use crate::services::database::migrations::ensure_column;

/// Username and password of the account seeded on first boot.
pub const SEED_ADMIN_USERNAME: &str = "superadmin";
pub const SEED_ADMIN_EMAIL: &str = "superadmin@auntrack.com";
pub const SEED_ADMIN_PASSWORD: &str = "admin123";

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    create_users_table(conn)?;
    create_categories_table(conn)?;
    create_events_table(conn)?;
    run_migrations(conn)?;
    seed_super_admin(conn)?;
    seed_starter_categories(conn)?;
    seed_sample_events(conn)?;
    Ok(())
}

fn create_users_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            name TEXT NOT NULL,
            can_edit INTEGER NOT NULL DEFAULT 0,
            can_add INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create users table")?;

    Ok(())
}

fn create_categories_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            color TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create categories table")?;

    Ok(())
}

fn create_events_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            color TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (category_id) REFERENCES categories (id) ON DELETE CASCADE
        )",
        [],
    )
    .context("Failed to create events table")?;

    Ok(())
}

/// Upgrades databases created before the per-account capability flags and
/// event descriptions existed.
fn run_migrations(conn: &Connection) -> Result<()> {
    ensure_column(
        conn,
        "users",
        "can_edit",
        "ALTER TABLE users ADD COLUMN can_edit INTEGER NOT NULL DEFAULT 0",
    )?;
    ensure_column(
        conn,
        "users",
        "can_add",
        "ALTER TABLE users ADD COLUMN can_add INTEGER NOT NULL DEFAULT 0",
    )?;
    ensure_column(
        conn,
        "events",
        "description",
        "ALTER TABLE events ADD COLUMN description TEXT",
    )?;
    Ok(())
}

/// Inserts the super_admin account on first boot.
fn seed_super_admin(conn: &Connection) -> Result<()> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM users WHERE role = 'super_admin'",
            [],
            |row| row.get(0),
        )
        .context("Failed to count super_admin accounts")?;

    if count > 0 {
        return Ok(());
    }

    log::info!("Seeding default super_admin account");
    let password_hash = bcrypt::hash(SEED_ADMIN_PASSWORD, bcrypt::DEFAULT_COST)
        .context("Failed to hash seed password")?;

    conn.execute(
        "INSERT INTO users (username, email, password_hash, role, name, can_edit, can_add)
         VALUES (?1, ?2, ?3, 'super_admin', 'Super Administrator', 1, 1)",
        params![SEED_ADMIN_USERNAME, SEED_ADMIN_EMAIL, password_hash],
    )
    .context("Failed to insert seed super_admin")?;

    Ok(())
}

fn seed_starter_categories(conn: &Connection) -> Result<()> {
    for category in starter_categories() {
        conn.execute(
            "INSERT OR IGNORE INTO categories (name, color) VALUES (?1, ?2)",
            params![category.name, category.color],
        )
        .with_context(|| format!("Failed to seed category '{}'", category.name))?;
    }

    Ok(())
}

/// Inserts sample events on an empty events table only.
fn seed_sample_events(conn: &Connection) -> Result<()> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
        .context("Failed to count events")?;

    if count > 0 {
        return Ok(());
    }

    log::info!("Seeding sample events");
    let samples = [
        (
            "HR Awards",
            "HR Events",
            "2025-08-01T00:00:00+00:00",
            "2025-08-02T23:59:59+00:00",
            "Annual HR Awards Ceremony",
        ),
        (
            "TownHall",
            "HR Events",
            "2025-08-04T00:00:00+00:00",
            "2025-08-04T23:59:59+00:00",
            "Monthly Town Hall Meeting",
        ),
        (
            "Marathon Run",
            "Automotive",
            "2025-08-01T00:00:00+00:00",
            "2025-08-06T23:59:59+00:00",
            "Annual Marathon Event",
        ),
    ];

    for (title, category, start, end, description) in samples {
        conn.execute(
            "INSERT INTO events (title, category_id, start_date, end_date, color, description)
             SELECT ?1, id, ?2, ?3, color, ?4 FROM categories WHERE name = ?5",
            params![title, start, end, description, category],
        )
        .with_context(|| format!("Failed to seed event '{}'", title))?;
    }

    Ok(())
}
