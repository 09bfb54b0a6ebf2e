pub mod column_mapper;
pub mod import_service;
pub mod party_import;
pub mod product_import;

pub use column_mapper::{normalize_header, ColumnMap, ImportField};
pub use import_service::ImportService;
