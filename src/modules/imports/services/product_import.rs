use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::column_mapper::{ColumnMap, ImportField};
use crate::modules::imports::models::ImportReport;
use crate::modules::products::models::ProductInput;

pub const PRODUCT_FIELDS: &[ImportField] = &[
    ImportField {
        name: "name",
        aliases: &["name", "productname", "product", "itemname", "item", "description"],
    },
    ImportField {
        name: "batch",
        aliases: &["batch", "batchno", "batchnumber", "lot", "lotno"],
    },
    ImportField {
        name: "expiry",
        aliases: &["expiry", "expirydate", "exp", "expdate", "expiration"],
    },
    ImportField {
        name: "hsn",
        aliases: &["hsn", "hsncode", "hsnsac"],
    },
    ImportField {
        name: "gst_rate",
        aliases: &["gst", "gstrate", "gstpercent", "taxrate", "tax"],
    },
    ImportField {
        name: "mrp",
        aliases: &["mrp", "maximumretailprice"],
    },
    ImportField {
        name: "sale_rate",
        aliases: &["salerate", "saleprice", "sellingprice", "sellingrate", "pts"],
    },
    ImportField {
        name: "purchase_rate",
        aliases: &["purchaserate", "purchaseprice", "costprice", "cost", "ptr", "rate"],
    },
    ImportField {
        name: "stock",
        aliases: &["stock", "openingstock", "qty", "quantity"],
    },
    ImportField {
        name: "manufacturer",
        aliases: &["manufacturer", "mfr", "mfg", "company", "brand"],
    },
];

const DEFAULT_BATCH: &str = "N/A";
const DEFAULT_HSN: &str = "3004";
const DEFAULT_GST_RATE: u8 = 12;
/// Sale rate derived from purchase rate when the sheet has none
const SALE_RATE_MARKUP: Decimal = Decimal::from_parts(12, 0, 0, false, 1);

/// Accepts plain numbers as well as "₹1,250.00" and "12%"
pub(crate) fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '₹' | ',' | '%' | ' '))
        .collect();
    Decimal::from_str(&cleaned).ok()
}

/// Day-first and ISO dates, or month/year meaning the last day of that month
pub(crate) fn parse_expiry(value: &str) -> Option<NaiveDate> {
    for format in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    let (month, year) = value.split_once(['/', '-'])?;
    let month: u32 = month.trim().parse().ok()?;
    let mut year: i32 = year.trim().parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    first_of_next.pred_opt().filter(|d| d.month() == month)
}

/// Turn sheet rows into product inputs, recording every decision in the report
pub fn parse_products(headers: &StringRecord, records: &[StringRecord]) -> (Vec<ProductInput>, ImportReport) {
    let columns = ColumnMap::resolve(headers, PRODUCT_FIELDS);
    let mut report = ImportReport {
        mapped_columns: columns.mapped_columns().clone(),
        unmapped_columns: columns.unmapped_columns().to_vec(),
        missing_fields: columns.missing_fields().to_vec(),
        ..Default::default()
    };

    let mut accepted = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 2;
        match parse_product_row(&columns, record, row, &mut report) {
            Ok(input) => accepted.push(input),
            Err(reason) => report.reject(row, reason),
        }
    }

    (accepted, report)
}

fn parse_product_row(
    columns: &ColumnMap,
    record: &StringRecord,
    row: usize,
    report: &mut ImportReport,
) -> Result<ProductInput, String> {
    if record.iter().all(|cell| cell.trim().is_empty()) {
        return Err("Empty row".to_string());
    }

    let name = columns
        .get(record, "name")
        .ok_or_else(|| "Missing product name".to_string())?;

    let raw_expiry = columns
        .get(record, "expiry")
        .ok_or_else(|| "Missing expiry date".to_string())?;
    let expiry = parse_expiry(raw_expiry)
        .ok_or_else(|| format!("Unrecognised expiry date: {}", raw_expiry))?;

    // Defaults are noted only once the row is known to be accepted
    let mut defaults: Vec<(&str, String)> = Vec::new();

    let batch = match columns.get(record, "batch") {
        Some(batch) => batch.to_string(),
        None => {
            defaults.push(("batch", DEFAULT_BATCH.to_string()));
            DEFAULT_BATCH.to_string()
        }
    };

    let hsn = match columns.get(record, "hsn") {
        Some(hsn) => hsn.to_string(),
        None => {
            defaults.push(("hsn", DEFAULT_HSN.to_string()));
            DEFAULT_HSN.to_string()
        }
    };

    let mut amount = |field: &'static str, fallback: Decimal| -> Result<Decimal, String> {
        match columns.get(record, field) {
            Some(raw) => parse_amount(raw).ok_or_else(|| format!("Invalid {}: {}", field, raw)),
            None => {
                defaults.push((field, fallback.to_string()));
                Ok(fallback)
            }
        }
    };

    let gst_rate = amount("gst_rate", Decimal::from(DEFAULT_GST_RATE))?;
    let mrp = amount("mrp", Decimal::ZERO)?;
    let purchase_rate = amount("purchase_rate", Decimal::ZERO)?;

    let sale_rate = match columns.get(record, "sale_rate") {
        Some(raw) => parse_amount(raw).ok_or_else(|| format!("Invalid sale_rate: {}", raw))?,
        None => {
            let derived = purchase_rate
                .checked_mul(SALE_RATE_MARKUP)
                .ok_or_else(|| format!("Purchase rate too large: {}", purchase_rate))?;
            defaults.push(("sale_rate", derived.to_string()));
            derived
        }
    };

    let stock = match columns.get(record, "stock") {
        Some(raw) => parse_amount(raw)
            .filter(|q| q.fract().is_zero())
            .and_then(|q| q.to_i32())
            .ok_or_else(|| format!("Invalid stock: {}", raw))?,
        None => {
            defaults.push(("stock", "0".to_string()));
            0
        }
    };

    let input = ProductInput {
        name: name.to_string(),
        batch,
        expiry,
        hsn,
        gst_rate,
        mrp,
        purchase_rate,
        sale_rate,
        stock,
        manufacturer: columns.get(record, "manufacturer").map(str::to_string),
    };
    input.validate().map_err(|e| e.to_string())?;

    for (field, value) in defaults {
        report.defaulted(row, field, value);
    }

    Ok(input)
}
