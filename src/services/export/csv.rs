//! Spreadsheet (CSV) export of the event set.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::event::Event;

const HEADER: &str = "Title,Category,Start,End,Color,Description";

/// Render events as CSV, one row per event, header first.
pub fn events_to_csv(events: &[Event]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for event in events {
        let row = [
            csv_escape(&event.title),
            csv_escape(event.category_name.as_deref().unwrap_or("")),
            csv_escape(&event.start.to_rfc3339()),
            csv_escape(&event.end.to_rfc3339()),
            csv_escape(&event.color),
            csv_escape(event.description.as_deref().unwrap_or("")),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Write the CSV rendition to a file.
pub fn write_csv(events: &[Event], path: &Path) -> Result<()> {
    fs::write(path, events_to_csv(events))
        .with_context(|| format!("Failed to write CSV to {}", path.display()))
}

/// Cells starting with formula triggers get a leading apostrophe so a
/// spreadsheet opens them as text.
fn should_neutralize(value: &str) -> bool {
    matches!(value.chars().next(), Some('=' | '+' | '-' | '@'))
}

fn neutralize_formula(value: &str) -> String {
    if should_neutralize(value) {
        format!("'{}", value)
    } else {
        value.to_string()
    }
}

fn csv_escape(value: &str) -> String {
    let safe = neutralize_formula(value);
    if safe.contains(',') || safe.contains('"') || safe.contains('\n') {
        format!("\"{}\"", safe.replace('"', "\"\""))
    } else {
        safe
    }
}
