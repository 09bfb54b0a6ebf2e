pub mod error;
pub mod money;
pub mod search;

pub use error::{AppError, LineRejection, Result};
