pub mod controllers;
pub mod models;
pub mod services;

pub use models::{GstRate, SupplyType};
pub use services::TaxCalculator;
