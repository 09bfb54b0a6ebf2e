use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A field filled with a fallback value on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultedValue {
    pub row: usize,
    pub field: String,
    pub value: String,
}

/// A row left out of the import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

/// Outcome of a spreadsheet import
///
/// Row numbers are file lines, so the header is row 1 and the first
/// record is row 2.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Field name to the header it was read from
    pub mapped_columns: BTreeMap<String, String>,
    /// Headers that matched no field
    pub unmapped_columns: Vec<String>,
    /// Fields with no matching header
    pub missing_fields: Vec<String>,
    pub defaulted: Vec<DefaultedValue>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn defaulted(&mut self, row: usize, field: &str, value: impl Into<String>) {
        self.defaulted.push(DefaultedValue {
            row,
            field: field.to_string(),
            value: value.into(),
        });
    }

    pub fn reject(&mut self, row: usize, reason: impl Into<String>) {
        self.rejected.push(RejectedRow {
            row,
            reason: reason.into(),
        });
    }
}
