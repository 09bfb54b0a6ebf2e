use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use tokio::sync::Mutex;

use crate::config::InvoicingConfig;
use crate::core::{AppError, Result};
use crate::modules::invoices::models::{
    CatalogLine, CreateInvoiceRequest, Invoice, InvoiceDraft, InvoiceNumber, InvoiceQuery,
    InvoiceStatus, PartySnapshot,
};
use crate::modules::invoices::repositories::InvoiceGateway;
use crate::modules::parties::PartyRepository;
use crate::modules::settings::CompanyProfileStore;
use crate::modules::taxes::{SupplyType, TaxCalculator};

/// Lines computed for a request, ready to be numbered and recorded
struct PreparedInvoice {
    date: NaiveDate,
    party: PartySnapshot,
    draft: InvoiceDraft,
}

/// Service for the invoice workflow
pub struct InvoiceService {
    gateway: Arc<dyn InvoiceGateway>,
    parties: PartyRepository,
    profile: Arc<CompanyProfileStore>,
    calculator: TaxCalculator,
    config: InvoicingConfig,
    /// Held from number assignment until the commit returns
    commit_lock: Mutex<()>,
}

impl InvoiceService {
    pub fn new(
        gateway: Arc<dyn InvoiceGateway>,
        parties: PartyRepository,
        profile: Arc<CompanyProfileStore>,
        config: InvoicingConfig,
    ) -> Self {
        Self {
            gateway,
            parties,
            profile,
            calculator: TaxCalculator::new(),
            config,
            commit_lock: Mutex::new(()),
        }
    }

    /// Compute an invoice without recording it or reserving a number
    pub async fn preview_invoice(&self, request: &CreateInvoiceRequest) -> Result<Invoice> {
        let prepared = self.prepare(request).await?;
        let invoice_no = self
            .assign_number(request.invoice_no.as_deref(), prepared.date)
            .await?;

        let invoice = self.build_invoice(invoice_no, prepared)?;
        tracing::debug!(
            invoice_no = %invoice.invoice_no,
            lines = invoice.lines.len(),
            grand_total = %invoice.totals.grand_total,
            "Invoice previewed"
        );

        Ok(invoice)
    }

    /// Compute, number and record an invoice, taking its items out of stock
    pub async fn create_invoice(&self, request: &CreateInvoiceRequest) -> Result<Invoice> {
        let status = request.status.unwrap_or_default();
        if status == InvoiceStatus::Cancelled {
            return Err(AppError::business_rule(
                "An invoice cannot be created as cancelled",
            ));
        }

        let prepared = self.prepare(request).await?;

        let _guard = self.commit_lock.lock().await;

        let invoice_no = self
            .assign_number(request.invoice_no.as_deref(), prepared.date)
            .await?;

        let invoice = self
            .build_invoice(invoice_no, prepared)?
            .with_status(status)
            .with_notes(request.notes.clone());

        let decrements = invoice.stock_decrements();
        self.gateway.commit_invoice(&invoice, &decrements).await
    }

    pub async fn get_invoice(&self, id: i64) -> Result<Invoice> {
        self.gateway
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))
    }

    pub async fn list_invoices(&self, query: &InvoiceQuery) -> Result<Vec<Invoice>> {
        self.gateway.list(query).await
    }

    /// Number the next invoice dated `date` would receive
    pub async fn next_invoice_number(&self, date: Option<NaiveDate>) -> Result<InvoiceNumber> {
        self.next_number_for(date.unwrap_or_else(today)).await
    }

    pub async fn update_status(&self, id: i64, status: InvoiceStatus) -> Result<Invoice> {
        let _guard = self.commit_lock.lock().await;
        self.gateway.update_status(id, status).await
    }

    async fn prepare(&self, request: &CreateInvoiceRequest) -> Result<PreparedInvoice> {
        let party_id = request
            .party_id
            .ok_or_else(|| AppError::business_rule("Select a party before creating an invoice"))?;

        if request.lines.is_empty() {
            return Err(AppError::business_rule(
                "Invoice must have at least one line item",
            ));
        }

        let party = self
            .parties
            .find_by_id(party_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Party {} not found", party_id)))?;

        let profile = self.profile.snapshot().await;
        let supply_type = match request.supply_type {
            Some(supply_type) => supply_type,
            None => SupplyType::between(profile.state_code.as_deref(), party.state_code.as_deref())
                .ok_or_else(|| {
                    AppError::business_rule(format!(
                        "Cannot determine place of supply for party '{}': set state codes on the \
                         company profile and the party, or choose the supply type explicitly",
                        party.name
                    ))
                })?,
        };

        let date = request.date.unwrap_or_else(today);
        let mut draft = InvoiceDraft::new(supply_type);

        for requested in &request.lines {
            let product = self
                .gateway
                .lookup_catalog_item(requested.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", requested.product_id))
                })?;

            if requested.quantity > product.stock {
                return Err(AppError::business_rule(format!(
                    "Insufficient stock for {} (batch {}): requested {}, available {}",
                    product.name, product.batch, requested.quantity, product.stock
                )));
            }

            if product.is_expired(date) {
                tracing::warn!(
                    product_id = product.id,
                    batch = %product.batch,
                    expiry = %product.expiry,
                    "Billing an expired batch"
                );
            }

            let line =
                CatalogLine::from_product(&product, requested.quantity, requested.discount_percent);
            draft = draft.with_line_added(&self.calculator, line)?;
        }

        Ok(PreparedInvoice {
            date,
            party: PartySnapshot::from(&party),
            draft,
        })
    }

    fn build_invoice(&self, invoice_no: InvoiceNumber, prepared: PreparedInvoice) -> Result<Invoice> {
        let supply_type = prepared.draft.supply_type();
        Invoice::new(
            invoice_no,
            prepared.date,
            prepared.party,
            supply_type,
            prepared.draft.into_lines(),
            self.config.round_off,
        )
    }

    async fn next_number_for(&self, date: NaiveDate) -> Result<InvoiceNumber> {
        self.gateway
            .next_invoice_number(&self.config.prefix, date.year())
            .await
    }

    /// Number for an invoice dated `date`
    ///
    /// A client-held number must carry the configured prefix and the invoice's
    /// year, and may not run ahead of the next free sequence. One that is
    /// already recorded fails at commit as a conflict.
    async fn assign_number(&self, held: Option<&str>, date: NaiveDate) -> Result<InvoiceNumber> {
        let next = self.next_number_for(date).await?;
        let held: InvoiceNumber = match held {
            Some(raw) => raw.trim().parse().map_err(AppError::Validation)?,
            None => return Ok(next),
        };

        if held.prefix != next.prefix || held.period != next.period {
            return Err(AppError::validation(format!(
                "Invoice number {} does not belong to {}/{} for an invoice dated {}",
                held, next.prefix, next.period, date
            )));
        }

        if held.sequence > next.sequence {
            return Err(AppError::validation(format!(
                "Invoice number {} is ahead of the next number {}",
                held, next
            )));
        }

        Ok(InvoiceNumber::new(next.prefix, next.period, held.sequence, next.width))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
