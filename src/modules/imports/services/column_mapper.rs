// Header matching for spreadsheet imports
//
// Headers are compared after normalization (lowercase ASCII alphanumerics
// only), so "Product Name", "product_name" and "PRODUCT-NAME" are the same
// column. Each field lists its accepted aliases in priority order; the first
// header matching any alias wins and a header is used for one field at most.

use std::collections::BTreeMap;

use csv::StringRecord;

/// One importable field and the header spellings accepted for it
#[derive(Debug, Clone, Copy)]
pub struct ImportField {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Resolved header positions for a set of fields
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    positions: BTreeMap<&'static str, usize>,
    mapped: BTreeMap<String, String>,
    unmapped: Vec<String>,
    missing: Vec<String>,
}

impl ColumnMap {
    pub fn resolve(headers: &StringRecord, fields: &[ImportField]) -> Self {
        let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut taken = vec![false; normalized.len()];
        let mut map = ColumnMap::default();

        for field in fields {
            let position = field.aliases.iter().find_map(|alias| {
                normalized
                    .iter()
                    .enumerate()
                    .find(|(idx, header)| !taken[*idx] && header.as_str() == *alias)
                    .map(|(idx, _)| idx)
            });

            match position {
                Some(idx) => {
                    taken[idx] = true;
                    map.positions.insert(field.name, idx);
                    map.mapped
                        .insert(field.name.to_string(), headers[idx].trim().to_string());
                }
                None => map.missing.push(field.name.to_string()),
            }
        }

        map.unmapped = headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| !taken[*idx] && !header.trim().is_empty())
            .map(|(_, header)| header.trim().to_string())
            .collect();

        map
    }

    /// Trimmed cell for `field`, `None` when the column is absent or the cell blank
    pub fn get<'r>(&self, record: &'r StringRecord, field: &str) -> Option<&'r str> {
        self.positions
            .get(field)
            .and_then(|&idx| record.get(idx))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn has(&self, field: &str) -> bool {
        self.positions.contains_key(field)
    }

    pub fn mapped_columns(&self) -> &BTreeMap<String, String> {
        &self.mapped
    }

    pub fn unmapped_columns(&self) -> &[String] {
        &self.unmapped
    }

    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }
}
