use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// A customer the distributor bills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: i64,
    pub name: String,
    pub gstin: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    /// Drug licence number
    pub dl_no: Option<String>,
    /// Two-digit GST state code used to decide the place of supply
    pub state_code: Option<String>,
}

/// The first two characters of a GSTIN are the registering state's code
pub fn state_code_from_gstin(gstin: &str) -> Option<String> {
    let prefix: String = gstin.trim().chars().take(2).collect();
    if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_digit()) {
        Some(prefix)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyInput {
    pub name: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub email: Option<String>,
    pub dl_no: Option<String>,
    pub state_code: Option<String>,
}

impl PartyInput {
    /// Validate and normalise; the state code falls back to the GSTIN prefix
    pub fn normalized(&self) -> Result<PartyInput> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Party name cannot be empty"));
        }
        if name.len() > 255 {
            return Err(AppError::validation("Party name cannot exceed 255 characters"));
        }

        let email = non_empty(self.email.as_deref());
        if let Some(ref email) = email {
            if !email.contains('@') {
                return Err(AppError::validation(format!("Invalid email address: {}", email)));
            }
        }

        let state_code = non_empty(self.state_code.as_deref());
        if let Some(ref code) = state_code {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
                return Err(AppError::validation(format!(
                    "State code must be two digits, got: {}",
                    code
                )));
            }
        }

        let gstin = self.gstin.trim().to_uppercase();
        let state_code = state_code.or_else(|| state_code_from_gstin(&gstin));

        Ok(PartyInput {
            name: name.to_string(),
            gstin,
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email,
            dl_no: non_empty(self.dl_no.as_deref()),
            state_code,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: i64,
}
