//! Display formatting for amounts and timestamps (Indian conventions).
//!
//! Amounts: `₹` followed by exactly two decimals, midpoint rounded away from
//! zero, no digit grouping. Dates: `dd/mm/yyyy`; date-times:
//! `dd/mm/yyyy, h:mm:ss am` in the configured UTC offset.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

pub const RUPEE: &str = "₹";

/// Placeholder for optional contact fields that are absent.
pub const NOT_AVAILABLE: &str = "N/A";

/// Round to two decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `1234.5` -> `1234.50`.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = round_money(amount);
    rounded.rescale(2);
    rounded.to_string()
}

/// `120` -> `₹120.00`.
pub fn format_inr(amount: Decimal) -> String {
    format!("{RUPEE}{}", format_amount(amount))
}

/// `dd/mm/yyyy` in the given offset.
pub fn format_date(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%d/%m/%Y").to_string()
}

/// `dd/mm/yyyy, h:mm:ss am` in the given offset.
pub fn format_date_time(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset)
        .format("%d/%m/%Y, %-I:%M:%S %P")
        .to_string()
}
