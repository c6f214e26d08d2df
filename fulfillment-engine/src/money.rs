//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary values are stored as `f64` in the persisted snapshots; every
//! calculation goes through `Decimal` and is rounded back to two places.

use rust_decimal::prelude::*;
use shared::OrderItem;

/// Rounding to 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed quantity per line item
pub const MAX_QUANTITY: u32 = 9999;

/// Convert f64 to Decimal, keeping the float's full precision; non-finite
/// values collapse to zero
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64_retain(value).unwrap_or(Decimal::ZERO)
}

/// Convert Decimal back to f64, rounded to 2 places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Sum of price × quantity over line-item snapshots
pub fn order_total(items: &[OrderItem]) -> f64 {
    let total = items.iter().fold(Decimal::ZERO, |acc, item| {
        acc + to_decimal(item.price) * Decimal::from(item.quantity)
    });
    to_f64(total)
}
