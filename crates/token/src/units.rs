//! Conversions between raw token amounts and display strings.

use crate::DashboardError;
use alloy_primitives::{
    utils::{format_units, parse_units, ParseUnits},
    U256,
};

/// Largest decimals value a user may enter.
pub const MAX_DECIMALS: u8 = 36;

/// Format a raw amount with `decimals`, dropping trailing zeros.
///
/// `1500000000000000000` with 18 decimals renders as `1.5`, and whole
/// amounts render without a fractional part.
pub fn format_amount(amount: U256, decimals: u8) -> Result<String, DashboardError> {
    let formatted =
        format_units(amount, decimals).map_err(|e| DashboardError::Format(e.to_string()))?;

    if !formatted.contains('.') {
        return Ok(formatted);
    }

    Ok(formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}

/// Parse a user-entered amount into raw units. The amount must be positive.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, DashboardError> {
    let amount = amount.trim();
    let parsed = parse_units(amount, decimals)
        .map_err(|e| DashboardError::InvalidAmount(format!("{amount}: {e}")))?;

    match parsed {
        ParseUnits::U256(value) if !value.is_zero() => Ok(value),
        _ => Err(DashboardError::InvalidAmount(format!(
            "{amount}: amount must be greater than zero"
        ))),
    }
}

/// Whether `amount` reads as a positive decimal number.
pub fn is_positive_amount(amount: &str) -> bool {
    amount
        .trim()
        .parse::<f64>()
        .is_ok_and(|value| value.is_finite() && value > 0.0)
}
