mod import_report;

pub use import_report::{DefaultedValue, ImportReport, RejectedRow};
