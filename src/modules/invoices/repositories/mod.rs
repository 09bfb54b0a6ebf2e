pub mod invoice_gateway;

pub use invoice_gateway::{InvoiceGateway, SqliteInvoiceGateway};
