//! Price arithmetic.
//!
//! Prices are stored as `NUMERIC` and handled as [`Decimal`] in major units
//! (rupees). The payment gateway wants integer minor units (paise).

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::CoreError;

/// Minor units per major unit.
const MINOR_UNITS: i64 = 100;

/// Convert a major-unit price to gateway minor units, rounding half away from zero.
pub fn to_minor_units(price: Decimal) -> Result<i64, CoreError> {
    (price * Decimal::from(MINOR_UNITS))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| CoreError::Validation(format!("Price {price} is out of range")))
}

/// Price of `quantity` units at `unit_price`.
pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}
