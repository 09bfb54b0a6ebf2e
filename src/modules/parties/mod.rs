// Parties (customers) module

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Party, PartyInput};
pub use repositories::PartyRepository;
