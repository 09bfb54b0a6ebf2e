use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Invoice number of the form `<prefix>/<year>/<zero-padded sequence>`, e.g. `GD/2026/007`
///
/// The sequence restarts at 1 for each accounting period (calendar year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber {
    pub prefix: String,
    pub period: i32,
    pub sequence: u32,
    pub width: usize,
}

impl InvoiceNumber {
    pub fn new(prefix: impl Into<String>, period: i32, sequence: u32, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            period,
            sequence,
            width,
        }
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{:0width$}",
            self.prefix,
            self.period,
            self.sequence,
            width = self.width
        )
    }
}

impl FromStr for InvoiceNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("Invalid invoice number: {}", s);

        let mut parts = s.rsplitn(3, '/');
        let sequence_part = parts.next().ok_or_else(invalid)?;
        let period_part = parts.next().ok_or_else(invalid)?;
        let prefix = parts.next().ok_or_else(invalid)?;

        if prefix.trim().is_empty() || sequence_part.is_empty() {
            return Err(invalid());
        }

        let period: i32 = period_part.parse().map_err(|_| invalid())?;
        let sequence: u32 = sequence_part.parse().map_err(|_| invalid())?;
        if sequence == 0 {
            return Err(invalid());
        }

        Ok(Self {
            prefix: prefix.to_string(),
            period,
            sequence,
            width: sequence_part.len(),
        })
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.to_string()
    }
}
