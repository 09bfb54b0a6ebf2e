use rust_decimal::{Decimal, RoundingStrategy};

/// Rupee amounts are shown and stored for display with 2 decimal places
pub const RUPEE_SCALE: u32 = 2;

/// Rounds an amount to paise, half away from zero
pub fn round(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(RUPEE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds an amount to the nearest whole rupee
pub fn round_to_rupee(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Display string with exactly two decimal places, e.g. `"141.75"`
pub fn to_display(amount: Decimal) -> String {
    format!("{:.2}", round(amount))
}

/// Formats an amount with the rupee sign for printed output
pub fn format_inr(amount: Decimal) -> String {
    format!("₹{}", to_display(amount))
}

/// Sum of amounts, or `None` once the running total leaves the Decimal range
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
}

/// Smallest unit (one paisa)
pub fn smallest_unit() -> Decimal {
    Decimal::new(1, RUPEE_SCALE)
}

/// Parses a stored decimal column; the database keeps amounts as exact text
pub fn parse_stored(column: &str, raw: &str) -> crate::core::Result<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        crate::core::AppError::internal(format!(
            "Stored amount in column '{}' is not a decimal ({}): {}",
            column, raw, e
        ))
    })
}
