// Liveness and readiness endpoints

pub mod controllers;
