//! Pricing

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::cart::CartLine;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Decimal arithmetic overflowed.
    #[error("price arithmetic overflowed for line {0}")]
    Overflow(String),
}

/// Convert discount percent points (e.g. `10` for 10%) into a fractional percentage.
///
/// Values outside `[0, 100]` are clamped.
pub fn discount_from_points(points: Decimal) -> Percentage {
    let points = points.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    Percentage::from(points / Decimal::ONE_HUNDRED)
}

/// Price of a single unit after applying the discount.
///
/// Returns `None` if the arithmetic overflows.
pub fn effective_unit_price(unit_price: Decimal, discount: Percentage) -> Option<Decimal> {
    // decimal_percentage doesn't expose the inner value, multiply it out instead
    let remaining = Decimal::ONE.checked_sub(discount * Decimal::ONE)?;

    unit_price.checked_mul(remaining)
}

/// Effective unit price multiplied by the line quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the arithmetic overflows.
pub fn line_total(line: &CartLine) -> Result<Decimal, PricingError> {
    effective_unit_price(line.unit_price(), line.discount())
        .and_then(|unit| unit.checked_mul(Decimal::from(line.quantity())))
        .ok_or_else(|| PricingError::Overflow(line.id().to_string()))
}

/// Sum of every line total.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line total, or the sum, overflows.
pub fn total_price(lines: &[CartLine]) -> Result<Decimal, PricingError> {
    lines.iter().try_fold(Decimal::ZERO, |acc, line| {
        acc.checked_add(line_total(line)?)
            .ok_or_else(|| PricingError::Overflow(line.id().to_string()))
    })
}

/// Sum of every line quantity.
pub fn total_quantity(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity())).sum()
}
