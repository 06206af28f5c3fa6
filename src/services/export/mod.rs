// Export service
// Spreadsheet (CSV) and document (PDF) renditions of the current event set

pub mod csv;
pub mod pdf;

pub use csv::{events_to_csv, write_csv};
pub use pdf::{export_event_list, PdfExportOptions};
