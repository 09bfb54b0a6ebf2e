// Invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CatalogLine, ComputedLine, Invoice, InvoiceDraft, InvoiceNumber, InvoiceStatus, InvoiceTotals};
pub use repositories::{InvoiceGateway, SqliteInvoiceGateway};
pub use services::{InvoiceAggregator, InvoiceService};
