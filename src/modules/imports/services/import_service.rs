use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use csv::{ReaderBuilder, StringRecord, Trim};

use super::party_import::parse_parties;
use super::product_import::parse_products;
use crate::core::{AppError, Result};
use crate::modules::imports::models::ImportReport;
use crate::modules::parties::PartyRepository;
use crate::modules::products::ProductRepository;

/// Bulk loads catalog items and parties from CSV exports or Excel workbooks
pub struct ImportService {
    products: ProductRepository,
    parties: PartyRepository,
}

impl ImportService {
    pub fn new(products: ProductRepository, parties: PartyRepository) -> Self {
        Self { products, parties }
    }

    pub async fn import_products(&self, data: &[u8]) -> Result<ImportReport> {
        let (headers, records) = read_sheet(data)?;
        let (accepted, mut report) = parse_products(&headers, &records);

        report.imported = if accepted.is_empty() {
            0
        } else {
            self.products.bulk_create(&accepted).await?
        };

        tracing::info!(
            imported = report.imported,
            rejected = report.rejected.len(),
            defaulted = report.defaulted.len(),
            "Product import finished"
        );
        Ok(report)
    }

    pub async fn import_parties(&self, data: &[u8]) -> Result<ImportReport> {
        let (headers, records) = read_sheet(data)?;
        let (accepted, mut report) = parse_parties(&headers, &records);

        report.imported = if accepted.is_empty() {
            0
        } else {
            self.parties.bulk_create(&accepted).await?
        };

        tracing::info!(
            imported = report.imported,
            rejected = report.rejected.len(),
            "Party import finished"
        );
        Ok(report)
    }
}

/// Zip container of an .xlsx workbook
const XLSX_MAGIC: &[u8] = b"PK\x03\x04";
/// OLE compound file of a legacy .xls workbook
const XLS_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Header row plus every record, short rows allowed
fn read_sheet(data: &[u8]) -> Result<(StringRecord, Vec<StringRecord>)> {
    if data.starts_with(XLSX_MAGIC) || data.starts_with(XLS_MAGIC) {
        read_workbook(data)
    } else {
        read_csv(data)
    }
}

fn read_csv(data: &[u8]) -> Result<(StringRecord, Vec<StringRecord>)> {
    // Spreadsheet exports often start with a byte order mark
    let data = data.strip_prefix(b"\xEF\xBB\xBF".as_slice()).unwrap_or(data);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::validation("CSV has no header row"));
    }

    let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((headers, records))
}

/// First worksheet only; every cell is rendered as text for the row parsers
fn read_workbook(data: &[u8]) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::validation("Workbook has no worksheets"))??;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<StringRecord>());

    let headers = rows
        .next()
        .filter(|headers| headers.iter().any(|h| !h.is_empty()))
        .ok_or_else(|| AppError::validation("Workbook has no header row"))?;

    Ok((headers, rows.collect()))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string().trim().to_string(),
    }
}
