// Product catalog module

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Product, ProductInput, ProductQuery};
pub use repositories::ProductRepository;
