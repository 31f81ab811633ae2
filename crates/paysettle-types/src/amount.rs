//! Precision-aware amount arithmetic.
//!
//! Amounts are exact decimals in whole units of their asset. Every asset has
//! a precision; anything finer than that precision is dropped by rounding
//! toward zero, never up.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{PaysettleError, Result};

/// Truncate `amount` to `decimals` fractional digits (toward zero).
#[must_use]
pub fn floor_to(amount: Decimal, decimals: u32) -> Decimal {
    amount.round_dp_with_strategy(decimals, RoundingStrategy::ToZero)
}

/// Smallest representable unit at the given precision (`10^-decimals`).
#[must_use]
pub fn unit(decimals: u32) -> Decimal {
    Decimal::new(1, decimals)
}

/// Reject negative amounts.
pub fn ensure_non_negative(field: &str, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PaysettleError::invalid(format!(
            "{field} must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// `floor(a * b / c)` at `decimals` precision.
///
/// Decimal division rounds at the 28th significant digit, which can carry
/// a value just below a precision boundary up onto it. The result is checked
/// against the exact product and stepped back one unit when that happened,
/// so `result * c <= a * b` always holds.
///
/// When `a * b` itself is outside the decimal range the division is done
/// first (`a / c * b`) and the same check runs in divided form,
/// `result / b * c <= a`. Only a result that does not fit is an overflow.
pub fn mul_div_floor(a: Decimal, b: Decimal, c: Decimal, decimals: u32) -> Result<Decimal> {
    if c.is_zero() {
        return Err(PaysettleError::invalid("division by zero amount"));
    }
    match a.checked_mul(b) {
        Some(product) => {
            let quotient = product
                .checked_div(c)
                .ok_or(PaysettleError::ArithmeticOverflow)?;
            let floored = floor_to(quotient, decimals);
            let back = floored
                .checked_mul(c)
                .ok_or(PaysettleError::ArithmeticOverflow)?;
            Ok(step_back_if(floored, back > product, decimals))
        }
        None => {
            let quotient = a
                .checked_div(c)
                .and_then(|q| q.checked_mul(b))
                .ok_or(PaysettleError::ArithmeticOverflow)?;
            let floored = floor_to(quotient, decimals);
            // b is non-zero here, otherwise the product would have fit
            let back = floored
                .checked_div(b)
                .and_then(|q| q.checked_mul(c))
                .ok_or(PaysettleError::ArithmeticOverflow)?;
            Ok(step_back_if(floored, back > a, decimals))
        }
    }
}

fn step_back_if(floored: Decimal, overshot: bool, decimals: u32) -> Decimal {
    if overshot && !floored.is_zero() {
        floored - unit(decimals)
    } else {
        floored
    }
}

/// Conversion rate implied by a quote: destination units per source unit.
pub fn rate_of(source_amount: Decimal, destination_amount: Decimal) -> Result<Decimal> {
    if source_amount.is_zero() {
        return Ok(Decimal::ZERO);
    }
    destination_amount
        .checked_div(source_amount)
        .ok_or(PaysettleError::ArithmeticOverflow)
}
