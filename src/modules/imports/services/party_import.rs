use csv::StringRecord;

use super::column_mapper::{ColumnMap, ImportField};
use crate::modules::imports::models::ImportReport;
use crate::modules::parties::models::PartyInput;

pub const PARTY_FIELDS: &[ImportField] = &[
    ImportField {
        name: "name",
        aliases: &["name", "partyname", "customername", "customer", "firmname", "firm"],
    },
    ImportField {
        name: "gstin",
        aliases: &["gstin", "gstno", "gstnumber", "gst"],
    },
    ImportField {
        name: "address",
        aliases: &["address", "addr", "city"],
    },
    ImportField {
        name: "phone",
        aliases: &["phone", "phoneno", "mobile", "mobileno", "contact", "contactno"],
    },
    ImportField {
        name: "email",
        aliases: &["email", "emailid", "mail"],
    },
    ImportField {
        name: "dl_no",
        aliases: &["dlno", "dl", "druglicence", "druglicense", "licenceno", "licenseno"],
    },
    ImportField {
        name: "state_code",
        aliases: &["statecode", "state"],
    },
];

pub fn parse_parties(headers: &StringRecord, records: &[StringRecord]) -> (Vec<PartyInput>, ImportReport) {
    let columns = ColumnMap::resolve(headers, PARTY_FIELDS);
    let mut report = ImportReport {
        mapped_columns: columns.mapped_columns().clone(),
        unmapped_columns: columns.unmapped_columns().to_vec(),
        missing_fields: columns.missing_fields().to_vec(),
        ..Default::default()
    };

    let mut accepted = Vec::new();
    for (idx, record) in records.iter().enumerate() {
        let row = idx + 2;
        match parse_party_row(&columns, record) {
            Ok((input, defaults)) => {
                for field in defaults {
                    report.defaulted(row, field, "");
                }
                accepted.push(input);
            }
            Err(reason) => report.reject(row, reason),
        }
    }

    (accepted, report)
}

fn parse_party_row(
    columns: &ColumnMap,
    record: &StringRecord,
) -> Result<(PartyInput, Vec<&'static str>), String> {
    let name = columns
        .get(record, "name")
        .ok_or_else(|| "Missing party name".to_string())?;

    let mut defaults = Vec::new();
    let mut text = |field: &'static str| match columns.get(record, field) {
        Some(value) => value.to_string(),
        None => {
            defaults.push(field);
            String::new()
        }
    };

    let gstin = text("gstin");
    let address = text("address");
    let phone = text("phone");

    let input = PartyInput {
        name: name.to_string(),
        gstin,
        address,
        phone,
        email: columns.get(record, "email").map(str::to_string),
        dl_no: columns.get(record, "dl_no").map(str::to_string),
        state_code: columns.get(record, "state_code").map(str::to_string),
    }
    .normalized()
    .map_err(|e| e.to_string())?;

    Ok((input, defaults))
}
