//! Constant-product swap pricing
//!
//! Pure, synchronous pricing functions for pools enforcing
//! `base_reserve * quote_reserve = k`. All amount arithmetic is done on
//! wei-scale integers, with `BigUint` intermediates so the
//! reserve-times-amount product cannot overflow. Prices are derived as `f64`
//! ratios for diagnostic display only and never feed back into amount math.
//!
//! The curve is fee-free. Real constant-product pools charge a swap fee
//! (0.3% historically), so reported profits overstate what an on-chain
//! round trip would return.

use crate::{Result, ScannerError};
use num_bigint::BigUint;

/// Output of a single swap computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapResult {
    /// Amount received, in wei of the output asset
    pub amount_out: u128,
    /// Marginal price of the output asset after the trade, as a unitless
    /// ratio of the post-trade reserves (output reserve / input reserve)
    pub price: f64,
}

/// Swap a fixed amount of base asset for quote asset.
///
/// `quote_out = quote_reserve * base_in / (base_reserve + base_in)`, the
/// amount that keeps the product of reserves constant. The returned price is
/// the post-trade marginal price of base in quote terms.
pub fn swap_base_for_quote(
    base_reserve: u128,
    quote_reserve: u128,
    base_in: u128,
) -> Result<SwapResult, ScannerError> {
    swap(base_reserve, quote_reserve, base_in, "base")
}

/// Swap a fixed amount of quote asset for base asset.
///
/// Mirror of [`swap_base_for_quote`] with the reserve roles exchanged; used
/// for the sell leg of a round trip.
pub fn swap_quote_for_base(
    quote_reserve: u128,
    base_reserve: u128,
    quote_in: u128,
) -> Result<SwapResult, ScannerError> {
    swap(quote_reserve, base_reserve, quote_in, "quote")
}

/// Shared constant-product computation.
///
/// `in_reserve` is the reserve of the asset being paid in, `out_reserve` the
/// reserve of the asset being received. `side` names the paid-in asset for
/// error messages.
fn swap(
    in_reserve: u128,
    out_reserve: u128,
    amount_in: u128,
    side: &str,
) -> Result<SwapResult, ScannerError> {
    if in_reserve == 0 {
        return Err(ScannerError::InsufficientLiquidity(format!(
            "{} reserve is zero",
            side
        )));
    }
    if out_reserve == 0 {
        return Err(ScannerError::InsufficientLiquidity(format!(
            "{} reserve is zero",
            if side == "base" { "quote" } else { "base" }
        )));
    }

    let in_after = in_reserve.checked_add(amount_in).ok_or_else(|| {
        ScannerError::Parse(format!("{} reserve plus trade amount overflows", side))
    })?;

    // out_reserve * amount_in can exceed u128 for large pools, so the
    // product is taken in BigUint. The quotient is strictly less than
    // out_reserve and always fits back into u128.
    let numerator = BigUint::from(out_reserve) * BigUint::from(amount_in);
    let amount_out = u128::try_from(numerator / BigUint::from(in_after))
        .map_err(|_| ScannerError::Parse("swap output exceeds u128".to_string()))?;

    let price = (out_reserve - amount_out) as f64 / in_after as f64;

    Ok(SwapResult { amount_out, price })
}
