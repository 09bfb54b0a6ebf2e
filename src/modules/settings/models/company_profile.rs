use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::parties::models::state_code_from_gstin;

/// The seller identity printed on every invoice
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub gstin: String,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub dl_no1: String,
    #[serde(default)]
    pub dl_no2: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub terms: String,
}

impl CompanyProfile {
    /// Profile shipped with demo data
    pub fn demo() -> Self {
        Self {
            company_name: "Gopi Distributors".to_string(),
            address_line1: "123, Pharma Market, Sector 5".to_string(),
            address_line2: "Mumbai, Maharashtra - 400001".to_string(),
            gstin: "27AAAAA0000A1Z5".to_string(),
            state_code: Some("27".to_string()),
            dl_no1: "MH-MZ1-000001".to_string(),
            dl_no2: "MH-MZ1-000002".to_string(),
            phone: "+91 98765 43210".to_string(),
            email: "info@gopidistributors.com".to_string(),
            terms: "1. Goods once sold will not be taken back.\n\
                    2. Interest @18% p.a. will be charged if payment is not made within due date.\n\
                    3. All disputes subject to Mumbai Jurisdiction."
                .to_string(),
        }
    }

    /// Trim fields and fill the state code from the GSTIN when absent
    pub fn normalized(&self) -> Result<CompanyProfile> {
        let company_name = self.company_name.trim();
        if company_name.is_empty() {
            return Err(AppError::validation("Company name cannot be empty"));
        }

        let gstin = self.gstin.trim().to_uppercase();
        let state_code = match self.state_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => {
                if code.len() != 2 || !code.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AppError::validation(format!(
                        "State code must be two digits, got: {}",
                        code
                    )));
                }
                Some(code.to_string())
            }
            _ => state_code_from_gstin(&gstin),
        };

        Ok(CompanyProfile {
            company_name: company_name.to_string(),
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.address_line2.trim().to_string(),
            gstin,
            state_code,
            dl_no1: self.dl_no1.trim().to_string(),
            dl_no2: self.dl_no2.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            terms: self.terms.clone(),
        })
    }
}
