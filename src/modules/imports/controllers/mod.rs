pub mod import_controller;

pub use import_controller::configure;
