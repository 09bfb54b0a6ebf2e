//! PharmaBill: GST invoicing and inventory for a pharmaceutical distributor
//!
//! Line tax computation, invoice aggregation and the SQLite persistence
//! gateway, served as a local JSON API.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::AppState;
pub use modules::invoices;
pub use modules::taxes;
