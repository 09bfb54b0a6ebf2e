// Invoice record as persisted by the invoice gateway
//
// An invoice carries a snapshot of the party as it was at billing time,
// the computed lines, and totals that are always re-derived from those
// lines. Stock decrements are derived from the lines as well.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice_number::InvoiceNumber;
use super::line_item::{ComputedLine, LineItemResponse};
use super::totals::{InvoiceTotals, TotalsResponse};
use crate::core::{money, AppError, Result};
use crate::modules::parties::models::Party;
use crate::modules::taxes::SupplyType;

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    /// Billed and settled at the counter
    Paid,
    /// Billed on credit
    Pending,
    /// Voided; stock has been returned
    Cancelled,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Paid
    }
}

impl InvoiceStatus {
    pub fn can_transition_to(&self, next: InvoiceStatus) -> bool {
        matches!(
            (self, next),
            (InvoiceStatus::Pending, InvoiceStatus::Paid)
                | (InvoiceStatus::Pending, InvoiceStatus::Cancelled)
                | (InvoiceStatus::Paid, InvoiceStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Paid => write!(f, "PAID"),
            InvoiceStatus::Pending => write!(f, "PENDING"),
            InvoiceStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(InvoiceStatus::Paid),
            "PENDING" => Ok(InvoiceStatus::Pending),
            "CANCELLED" => Ok(InvoiceStatus::Cancelled),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

/// Party fields copied onto the invoice at billing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySnapshot {
    pub party_id: i64,
    pub name: String,
    pub gstin: String,
    pub address: String,
    pub state_code: Option<String>,
}

impl From<&Party> for PartySnapshot {
    fn from(party: &Party) -> Self {
        Self {
            party_id: party.id,
            name: party.name.clone(),
            gstin: party.gstin.clone(),
            address: party.address.clone(),
            state_code: party.state_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    /// Row id, assigned on commit
    pub id: Option<i64>,
    pub invoice_no: InvoiceNumber,
    pub date: NaiveDate,
    pub party: PartySnapshot,
    pub supply_type: SupplyType,
    pub lines: Vec<ComputedLine>,
    pub totals: InvoiceTotals,
    /// Amount added to the grand total to reach the payable figure
    pub round_off: Decimal,
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Assemble an invoice from computed lines
    ///
    /// Lines must be non-empty and all computed under `supply_type`.
    pub fn new(
        invoice_no: InvoiceNumber,
        date: NaiveDate,
        party: PartySnapshot,
        supply_type: SupplyType,
        lines: Vec<ComputedLine>,
        round_to_rupee: bool,
    ) -> Result<Self> {
        Self::validate_lines(&lines, supply_type)?;

        let totals = InvoiceTotals::aggregate(&lines)?;
        let round_off = if round_to_rupee {
            money::round_to_rupee(totals.grand_total) - totals.grand_total
        } else {
            Decimal::ZERO
        };

        Ok(Self {
            id: None,
            invoice_no,
            date,
            party,
            supply_type,
            lines,
            totals,
            round_off,
            status: InvoiceStatus::default(),
            notes: None,
            created_at: Utc::now(),
        })
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    /// Grand total plus round-off
    pub fn net_payable(&self) -> Decimal {
        self.totals.grand_total + self.round_off
    }

    /// Quantity to take out of stock per product
    pub fn stock_decrements(&self) -> BTreeMap<i64, i32> {
        let mut decrements = BTreeMap::new();
        for line in &self.lines {
            *decrements.entry(line.product_id()).or_insert(0) += line.quantity();
        }
        decrements
    }

    fn validate_lines(lines: &[ComputedLine], supply_type: SupplyType) -> Result<()> {
        if lines.is_empty() {
            return Err(AppError::business_rule(
                "Invoice must have at least one line item",
            ));
        }

        if let Some((idx, _)) = lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.supply_type != supply_type)
        {
            return Err(AppError::validation(format!(
                "Line {} was computed for a different supply type than the invoice ({})",
                idx, supply_type
            )));
        }

        Ok(())
    }
}

/// Request body for preview and creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub party_id: Option<i64>,
    pub date: Option<NaiveDate>,
    /// Overrides the state-code comparison
    pub supply_type: Option<SupplyType>,
    /// Client-held number, reused when a save is retried
    pub invoice_no: Option<String>,
    #[serde(default)]
    pub lines: Vec<CreateLineItemRequest>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLineItemRequest {
    pub product_id: i64,
    pub quantity: i32,
    #[serde(default)]
    pub discount_percent: Decimal,
}

/// Filters for listing invoices, newest first
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceQuery {
    pub status: Option<InvoiceStatus>,
    pub party_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoicePreviewResponse {
    pub invoice_no: String,
    pub supply_type: SupplyType,
    pub lines: Vec<LineItemResponse>,
    pub totals: TotalsResponse,
    pub round_off: String,
    pub net_payable: String,
}

impl From<&Invoice> for InvoicePreviewResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            invoice_no: invoice.invoice_no.to_string(),
            supply_type: invoice.supply_type,
            lines: invoice.lines.iter().map(LineItemResponse::from).collect(),
            totals: TotalsResponse::from(&invoice.totals),
            round_off: money::to_display(invoice.round_off),
            net_payable: money::to_display(invoice.net_payable()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: Option<i64>,
    pub invoice_no: String,
    pub date: NaiveDate,
    pub party: PartySnapshot,
    pub supply_type: SupplyType,
    pub status: InvoiceStatus,
    pub lines: Vec<LineItemResponse>,
    pub totals: TotalsResponse,
    pub round_off: String,
    pub net_payable: String,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<&Invoice> for InvoiceResponse {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            invoice_no: invoice.invoice_no.to_string(),
            date: invoice.date,
            party: invoice.party.clone(),
            supply_type: invoice.supply_type,
            status: invoice.status,
            lines: invoice.lines.iter().map(LineItemResponse::from).collect(),
            totals: TotalsResponse::from(&invoice.totals),
            round_off: money::to_display(invoice.round_off),
            net_payable: money::to_display(invoice.net_payable()),
            notes: invoice.notes.clone(),
            created_at: invoice.created_at.to_rfc3339(),
        }
    }
}
