// Spreadsheet (CSV) import of products and parties

pub mod controllers;
pub mod models;
pub mod services;

pub use models::ImportReport;
pub use services::ImportService;
