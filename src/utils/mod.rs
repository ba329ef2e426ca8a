//! Utility modules

pub mod logger;

use crate::{Result, ScannerError, WEI_PER_UNIT};
use rust_decimal::Decimal;
use tracing::warn;

/// Convert a whole-unit amount from configuration into wei.
///
/// Values that cannot be represented exactly at wei scale are truncated with
/// an advisory warning; the conversion itself never fails for finite,
/// non-negative input.
pub fn units_to_wei(amount: f64) -> Result<u128, ScannerError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ScannerError::Config(format!(
            "Amount must be a finite non-negative number, got {}",
            amount
        )));
    }
    let scaled = amount * WEI_PER_UNIT as f64;
    if scaled >= u128::MAX as f64 {
        return Err(ScannerError::Config(format!(
            "Amount {} does not fit the wei scale",
            amount
        )));
    }
    if scaled.fract() != 0.0 {
        warn!(amount, "value is not exactly representable at wei scale, truncating");
    }
    Ok(scaled as u128)
}

/// Signed variant of [`units_to_wei`], for thresholds that may be negative
pub fn units_to_wei_signed(amount: f64) -> Result<i128, ScannerError> {
    if !amount.is_finite() {
        return Err(ScannerError::Config(format!(
            "Amount must be a finite number, got {}",
            amount
        )));
    }
    let scaled = amount * WEI_PER_UNIT as f64;
    if scaled >= i128::MAX as f64 || scaled <= i128::MIN as f64 {
        return Err(ScannerError::Config(format!(
            "Amount {} does not fit the wei scale",
            amount
        )));
    }
    if scaled.fract() != 0.0 {
        warn!(amount, "value is not exactly representable at wei scale, truncating");
    }
    Ok(scaled as i128)
}

/// Exact wei to whole-unit conversion for display.
///
/// Saturates at `Decimal`'s range, which only matters above ~7.9e10 whole
/// tokens.
pub fn wei_to_units(wei: u128) -> Decimal {
    i128::try_from(wei)
        .ok()
        .and_then(|w| Decimal::try_from_i128_with_scale(w, 18).ok())
        .map(|d| d.normalize())
        .unwrap_or(Decimal::MAX)
}

/// Signed variant of [`wei_to_units`], for profits
pub fn wei_to_units_signed(wei: i128) -> Decimal {
    Decimal::try_from_i128_with_scale(wei, 18)
        .map(|d| d.normalize())
        .unwrap_or(if wei < 0 { Decimal::MIN } else { Decimal::MAX })
}
