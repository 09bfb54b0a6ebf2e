use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::LineRejection;

/// GST slabs a catalog item can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GstRate {
    Zero,
    Five,
    Twelve,
    Eighteen,
    TwentyEight,
}

impl GstRate {
    pub const ALL: [GstRate; 5] = [
        GstRate::Zero,
        GstRate::Five,
        GstRate::Twelve,
        GstRate::Eighteen,
        GstRate::TwentyEight,
    ];

    pub fn percent(&self) -> u8 {
        match self {
            GstRate::Zero => 0,
            GstRate::Five => 5,
            GstRate::Twelve => 12,
            GstRate::Eighteen => 18,
            GstRate::TwentyEight => 28,
        }
    }

    pub fn as_decimal(&self) -> Decimal {
        Decimal::from(self.percent())
    }
}

impl Default for GstRate {
    fn default() -> Self {
        GstRate::Twelve
    }
}

impl fmt::Display for GstRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl TryFrom<u8> for GstRate {
    type Error = LineRejection;

    fn try_from(percent: u8) -> Result<Self, Self::Error> {
        match percent {
            0 => Ok(GstRate::Zero),
            5 => Ok(GstRate::Five),
            12 => Ok(GstRate::Twelve),
            18 => Ok(GstRate::Eighteen),
            28 => Ok(GstRate::TwentyEight),
            other => Err(LineRejection::UnsupportedTaxRate(other.to_string())),
        }
    }
}

impl TryFrom<Decimal> for GstRate {
    type Error = LineRejection;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        let rejected = || LineRejection::UnsupportedTaxRate(percent.normalize().to_string());

        if percent.fract() != Decimal::ZERO {
            return Err(rejected());
        }

        let whole = percent.to_u8().ok_or_else(rejected)?;

        GstRate::try_from(whole).map_err(|_| rejected())
    }
}

impl From<GstRate> for u8 {
    fn from(rate: GstRate) -> Self {
        rate.percent()
    }
}

/// Place-of-supply decision for a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyType {
    /// Buyer and seller in the same state: CGST + SGST
    Intra,
    /// Buyer in another state: IGST
    Inter,
}

impl SupplyType {
    pub fn is_intra(&self) -> bool {
        matches!(self, SupplyType::Intra)
    }

    /// Decides the supply type from two state codes; `None` when either side is unknown
    pub fn between(seller_state: Option<&str>, buyer_state: Option<&str>) -> Option<Self> {
        let seller = seller_state.map(str::trim).filter(|s| !s.is_empty())?;
        let buyer = buyer_state.map(str::trim).filter(|s| !s.is_empty())?;

        if seller.eq_ignore_ascii_case(buyer) {
            Some(SupplyType::Intra)
        } else {
            Some(SupplyType::Inter)
        }
    }
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::Intra => write!(f, "intra"),
            SupplyType::Inter => write!(f, "inter"),
        }
    }
}

impl std::str::FromStr for SupplyType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "intra" => Ok(SupplyType::Intra),
            "inter" => Ok(SupplyType::Inter),
            _ => Err(format!("Invalid supply type: {}", s)),
        }
    }
}
