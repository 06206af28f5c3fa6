//! Client-side calendar state.
//!
//! Mirrors the server's event and category sets plus the visible month.
//! Mutations go to the backend first and are applied locally only after the
//! server confirms, so the store never drifts ahead of persisted state.
//! Month and year navigation is purely local.

use chrono::{Datelike, Local, NaiveDate};

use crate::client::api::{ApiClient, ApiClientError};
use crate::client::grid;
use crate::client::reschedule::{reschedule, DragPayload};
use crate::models::category::{Category, CategoryPatch};
use crate::models::event::{Event, EventPatch};

/// Events, categories, and the visible month.
pub struct CalendarStore {
    api: ApiClient,
    events: Vec<Event>,
    categories: Vec<Category>,
    year: i32,
    month: u32,
}

impl CalendarStore {
    /// New store showing the current month. Call [`refresh`](Self::refresh)
    /// to populate it.
    pub fn new(api: ApiClient) -> Self {
        let today = Local::now();
        Self {
            api,
            events: Vec::new(),
            categories: Vec::new(),
            year: today.year(),
            month: today.month(),
        }
    }

    /// Reload both collections from the server.
    pub fn refresh(&mut self) -> Result<(), ApiClientError> {
        self.events = self.api.list_events()?;
        self.categories = self.api.list_categories()?;
        Ok(())
    }

    // --- views ---

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The days of the visible month.
    pub fn current_days(&self) -> Vec<NaiveDate> {
        grid::month_days(self.year, self.month)
    }

    pub fn events_for_date(&self, day: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| grid::on_date(event, day))
            .collect()
    }

    /// Events overlapping the closed day range `[from, to]`.
    pub fn events_in_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.start.date_naive() <= to && from <= event.end.date_naive())
            .collect()
    }

    pub fn events_for_category(&self, category_id: i64) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.category_id == category_id)
            .collect()
    }

    // --- navigation (local only) ---

    /// Set the visible month (1-12). Out-of-range values are ignored.
    pub fn set_month(&mut self, month: u32) {
        if (1..=12).contains(&month) {
            self.month = month;
        } else {
            log::warn!("Ignoring invalid month {}", month);
        }
    }

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
    }

    // --- event mutations (backend first) ---

    pub fn add_event(&mut self, event: Event) -> Result<Event, ApiClientError> {
        let created = self.api.create_event(&event)?;
        self.insert_sorted(created.clone());
        Ok(created)
    }

    pub fn update_event(&mut self, id: i64, patch: EventPatch) -> Result<Event, ApiClientError> {
        let updated = self.api.update_event(id, &patch)?;
        self.events.retain(|event| event.id != Some(id));
        self.insert_sorted(updated.clone());
        Ok(updated)
    }

    pub fn delete_event(&mut self, id: i64) -> Result<(), ApiClientError> {
        self.api.delete_event(id)?;
        self.events.retain(|event| event.id != Some(id));
        Ok(())
    }

    /// Move an event so its first day lands on `target_day`. Dropping an
    /// event on its own start day is a no-op.
    pub fn move_event(
        &mut self,
        id: i64,
        target_day: NaiveDate,
    ) -> Result<Option<Event>, ApiClientError> {
        let Some(event) = self.events.iter().find(|event| event.id == Some(id)) else {
            log::warn!("Dropped unknown event {}", id);
            return Ok(None);
        };

        match reschedule(event, target_day) {
            Some(patch) => self.update_event(id, patch).map(Some),
            None => Ok(None),
        }
    }

    /// Handle a raw drop payload. A malformed payload is logged and ignored.
    pub fn handle_drop(
        &mut self,
        raw_payload: &str,
        target_day: NaiveDate,
    ) -> Result<Option<Event>, ApiClientError> {
        match DragPayload::parse(raw_payload) {
            Some(payload) => self.move_event(payload.event_id, target_day),
            None => {
                log::warn!("Ignoring malformed drag payload: {:?}", raw_payload);
                Ok(None)
            }
        }
    }

    // --- category mutations (backend first) ---

    pub fn add_category(&mut self, name: &str, color: &str) -> Result<Category, ApiClientError> {
        let created = self.api.create_category(name, color)?;
        self.categories.push(created.clone());
        self.categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(created)
    }

    pub fn update_category(
        &mut self,
        id: i64,
        patch: CategoryPatch,
    ) -> Result<Category, ApiClientError> {
        let updated = self.api.update_category(id, &patch)?;
        if let Some(slot) = self.categories.iter_mut().find(|c| c.id == Some(id)) {
            *slot = updated.clone();
        }
        self.categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(updated)
    }

    /// Delete a category. The server cascades to its events, so the local
    /// event set drops them as well.
    pub fn delete_category(&mut self, id: i64) -> Result<(), ApiClientError> {
        self.api.delete_category(id)?;
        self.categories.retain(|category| category.id != Some(id));
        self.events.retain(|event| event.category_id != id);
        Ok(())
    }

    fn insert_sorted(&mut self, event: Event) {
        let index = self
            .events
            .partition_point(|existing| existing.start <= event.start);
        self.events.insert(index, event);
    }
}
