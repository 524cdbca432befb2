//! Fixed-point unit conversion.
//!
//! The single point of truth for moving token amounts between the chain's
//! smallest-unit integers and the decimal strings the application shows.
//! Every amount crossing the chain boundary goes through these two
//! functions with the same decimals value, so the scale factor can never
//! drift between the read and write paths.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::chain::{Result, ServiceError};

/// Convert a smallest-unit integer to a decimal string.
///
/// Trailing fractional zeros are trimmed ("1.500000000000000000" becomes
/// "1.5", "3.000…" becomes "3"); trimming never changes the value, so
/// [`parse_token_units`] round-trips exactly.
pub fn format_token_units(value: U256, decimals: u8) -> String {
    let raw = match format_units(value, decimals) {
        Ok(s) => s,
        // Unreachable for the 0..=77 decimals alloy supports; fall back to
        // the integer representation rather than corrupting the amount.
        Err(_) => return value.to_string(),
    };
    if raw.contains('.') {
        raw.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        raw
    }
}

/// Convert a decimal string to a smallest-unit integer.
///
/// Negative and malformed inputs are errors; this runs immediately before
/// transaction submission, where silently substituting zero would be worse
/// than failing.
pub fn parse_token_units(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount.trim(), decimals)
        .map_err(|e| ServiceError::Units(format!("cannot parse {amount:?}: {e}")))?;
    if parsed.is_negative() {
        return Err(ServiceError::Units(format!(
            "negative amount not allowed: {amount:?}"
        )));
    }
    Ok(parsed.get_absolute())
}
