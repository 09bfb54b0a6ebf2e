// Company profile settings module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::CompanyProfile;
pub use repositories::SettingsRepository;
pub use services::CompanyProfileStore;
