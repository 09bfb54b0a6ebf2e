mod draft;
mod invoice;
mod invoice_number;
mod line_item;
mod totals;

pub use draft::InvoiceDraft;
pub use invoice::{
    CreateInvoiceRequest, CreateLineItemRequest, Invoice, InvoicePreviewResponse,
    InvoiceQuery, InvoiceResponse, InvoiceStatus, PartySnapshot, UpdateStatusRequest,
};
pub use invoice_number::InvoiceNumber;
pub use line_item::{CatalogLine, ComputedLine, LineItemResponse};
pub use totals::{InvoiceTotals, TotalsResponse};
