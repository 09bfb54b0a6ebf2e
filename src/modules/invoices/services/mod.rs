pub mod aggregator;
pub mod invoice_service;

pub use aggregator::InvoiceAggregator;
pub use invoice_service::InvoiceService;
