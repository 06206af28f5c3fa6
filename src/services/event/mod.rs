//! Event service.
//!
//! CRUD over the events table. Reads join in the owning category's name and
//! color so API consumers never need a second lookup; partial updates merge
//! onto the stored row before validation.

use anyhow::Context;
use chrono::{DateTime, Local};
use rusqlite::{params, Connection, Row};

use crate::models::event::{Event, EventPatch, EventValidationError};

/// Errors surfaced by event operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error(transparent)]
    Validation(#[from] EventValidationError),
    #[error("Event not found")]
    NotFound,
    #[error("Category not found")]
    UnknownCategory,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

const SELECT_JOINED: &str = "SELECT e.id, e.title, e.category_id, c.name, e.start_date,
        e.end_date, e.color, e.description
 FROM events e
 JOIN categories c ON e.category_id = c.id";

/// Service for managing calendar events.
pub struct EventService<'a> {
    conn: &'a Connection,
}

impl<'a> EventService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All events joined with their category, ordered by start date.
    pub fn list(&self) -> Result<Vec<Event>, EventError> {
        let query = format!("{} ORDER BY e.start_date", SELECT_JOINED);
        let mut stmt = self
            .conn
            .prepare(&query)
            .context("Failed to prepare event list query")?;

        let events = stmt
            .query_map([], row_to_event)
            .context("Failed to query events")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read event rows")?;

        Ok(events)
    }

    pub fn get(&self, id: i64) -> Result<Option<Event>, EventError> {
        let query = format!("{} WHERE e.id = ?1", SELECT_JOINED);
        let result = self.conn.query_row(&query, [id], row_to_event);

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(EventError::Internal(e.into())),
        }
    }

    /// Create a new event.
    pub fn create(&self, event: Event) -> Result<Event, EventError> {
        event.validate()?;

        let result = self.conn.execute(
            "INSERT INTO events (title, category_id, start_date, end_date, color, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.title.trim(),
                event.category_id,
                event.start.to_rfc3339(),
                event.end.to_rfc3339(),
                event.color,
                event.description,
            ],
        );

        match result {
            Ok(_) => {}
            // FK violation: the referenced category does not exist.
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(EventError::UnknownCategory);
            }
            Err(e) => {
                return Err(EventError::Internal(
                    anyhow::Error::from(e).context("Failed to insert event"),
                ))
            }
        }

        let id = self.conn.last_insert_rowid();
        self.get(id)?.ok_or(EventError::NotFound)
    }

    /// Merge a partial update onto the stored event and persist it.
    pub fn update(&self, id: i64, patch: EventPatch) -> Result<Event, EventError> {
        let current = self.get(id)?.ok_or(EventError::NotFound)?;
        let merged = patch.apply_to(&current);
        merged.validate()?;

        let result = self.conn.execute(
            "UPDATE events SET title = ?1, category_id = ?2, start_date = ?3,
                               end_date = ?4, color = ?5, description = ?6
             WHERE id = ?7",
            params![
                merged.title.trim(),
                merged.category_id,
                merged.start.to_rfc3339(),
                merged.end.to_rfc3339(),
                merged.color,
                merged.description,
                id,
            ],
        );

        match result {
            Ok(0) => return Err(EventError::NotFound),
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                return Err(EventError::UnknownCategory);
            }
            Err(e) => {
                return Err(EventError::Internal(
                    anyhow::Error::from(e).context("Failed to update event"),
                ))
            }
        }

        self.get(id)?.ok_or(EventError::NotFound)
    }

    pub fn delete(&self, id: i64) -> Result<(), EventError> {
        let rows = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", [id])
            .context("Failed to delete event")?;

        if rows == 0 {
            return Err(EventError::NotFound);
        }

        Ok(())
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: Some(row.get(0)?),
        title: row.get(1)?,
        category_id: row.get(2)?,
        category_name: Some(row.get(3)?),
        start: to_local_datetime(row.get::<_, String>(4)?)?,
        end: to_local_datetime(row.get::<_, String>(5)?)?,
        color: row.get(6)?,
        description: row.get(7)?,
        created_at: None,
    })
}

/// Parses an RFC 3339 column value back into local time.
fn to_local_datetime(value: String) -> rusqlite::Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::category::CategoryService;
    use crate::services::database::Database;
    use chrono::TimeZone;

    fn empty_db() -> Database {
        // Schema without sample events: seed, then clear.
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        db.connection().execute("DELETE FROM events", []).unwrap();
        db
    }

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn hr_category_id(db: &Database) -> i64 {
        CategoryService::new(db.connection())
            .list()
            .unwrap()
            .into_iter()
            .find(|c| c.name == "HR Events")
            .and_then(|c| c.id)
            .unwrap()
    }

    #[test]
    fn test_create_joins_category_name() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        let event = Event::new(
            "HR Awards",
            category_id,
            dt(2025, 8, 1, 0, 0),
            dt(2025, 8, 2, 23, 59),
            "#fb923c",
        )
        .unwrap();

        let created = service.create(event).unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.category_name.as_deref(), Some("HR Events"));
    }

    #[test]
    fn test_create_unknown_category() {
        let db = empty_db();
        let service = EventService::new(db.connection());

        let event = Event::new(
            "Orphan",
            9999,
            dt(2025, 8, 1, 0, 0),
            dt(2025, 8, 1, 1, 0),
            "#fff",
        )
        .unwrap();
        assert!(matches!(service.create(event), Err(EventError::UnknownCategory)));
    }

    #[test]
    fn test_round_trip_preserves_instants() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        let start = dt(2025, 8, 5, 9, 0);
        let end = dt(2025, 8, 7, 17, 0);
        let created = service
            .create(Event::new("Offsite", category_id, start, end, "#fb923c").unwrap())
            .unwrap();

        let fetched = service.get(created.id.unwrap()).unwrap().unwrap();
        assert_eq!(fetched.start, start);
        assert_eq!(fetched.end, end);
    }

    #[test]
    fn test_list_ordered_by_start() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        service
            .create(
                Event::new("Later", category_id, dt(2025, 8, 10, 0, 0), dt(2025, 8, 10, 1, 0), "#fff")
                    .unwrap(),
            )
            .unwrap();
        service
            .create(
                Event::new("Sooner", category_id, dt(2025, 8, 2, 0, 0), dt(2025, 8, 2, 1, 0), "#fff")
                    .unwrap(),
            )
            .unwrap();

        let events = service.list().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Sooner");
    }

    #[test]
    fn test_update_partial_merge() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        let created = service
            .create(
                Event::new("TownHall", category_id, dt(2025, 8, 4, 9, 0), dt(2025, 8, 4, 17, 0), "#fb923c")
                    .unwrap(),
            )
            .unwrap();

        let patch = EventPatch {
            title: Some("TownHall Q3".to_string()),
            ..Default::default()
        };
        let updated = service.update(created.id.unwrap(), patch).unwrap();

        assert_eq!(updated.title, "TownHall Q3");
        assert_eq!(updated.start, created.start);
        assert_eq!(updated.color, "#fb923c");
    }

    #[test]
    fn test_update_rejects_inverted_interval() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        let created = service
            .create(
                Event::new("Window", category_id, dt(2025, 8, 4, 9, 0), dt(2025, 8, 4, 17, 0), "#fff")
                    .unwrap(),
            )
            .unwrap();

        let patch = EventPatch {
            end: Some(dt(2025, 8, 1, 0, 0)),
            ..Default::default()
        };
        let result = service.update(created.id.unwrap(), patch);
        assert!(matches!(
            result,
            Err(EventError::Validation(EventValidationError::EndBeforeStart))
        ));
    }

    #[test]
    fn test_update_not_found() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let result = service.update(424242, EventPatch::default());
        assert!(matches!(result, Err(EventError::NotFound)));
    }

    #[test]
    fn test_delete() {
        let db = empty_db();
        let service = EventService::new(db.connection());
        let category_id = hr_category_id(&db);

        let created = service
            .create(
                Event::new("Gone", category_id, dt(2025, 8, 1, 0, 0), dt(2025, 8, 1, 1, 0), "#fff")
                    .unwrap(),
            )
            .unwrap();
        let id = created.id.unwrap();

        service.delete(id).unwrap();
        assert!(service.get(id).unwrap().is_none());
        assert!(matches!(service.delete(id), Err(EventError::NotFound)));
    }
}
