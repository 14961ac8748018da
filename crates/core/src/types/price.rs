//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices arrive as JSON numbers. They are converted to [`Decimal`]
//! on the way in so that line prices and cart totals are computed exactly,
//! and converted back to numbers on the way out so persisted carts keep the
//! same shape as catalog products.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Prices are never negative.
    #[error("price must not be negative (got {0})")]
    Negative(Decimal),

    /// The number could not be represented as a decimal (NaN, infinite, too large).
    #[error("price is not a representable decimal: {0}")]
    NotRepresentable(String),
}

/// A non-negative price in the store currency (USD).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: u32) -> Self {
        Self(Decimal::new(i64::from(cents), 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at the largest representable amount.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round half away from zero; `{:.2}` alone truncates
        let cents = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "${cents:.2}")
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let amount = Decimal::from_f64(value)
            .ok_or_else(|| PriceError::NotRepresentable(value.to_string()))?;
        Self::new(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0.to_f64().unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        let err = Price::new(Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, PriceError::Negative(_)));
        assert!(Price::try_from(-0.5_f64).is_err());
    }

    #[test]
    fn test_display_formats_two_decimals() {
        assert_eq!(Price::from_cents(1000).to_string(), "$10.00");
        assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
        assert_eq!(Price::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn test_display_rounds_to_nearest_cent() {
        assert_eq!(Price::try_from(12.999).unwrap().to_string(), "$13.00");
        assert_eq!(Price::try_from(0.005).unwrap().to_string(), "$0.01");
        assert_eq!(Price::try_from(4.994).unwrap().to_string(), "$4.99");

        let line = Price::new(Decimal::new(3335, 3)).unwrap().times(3);
        assert_eq!(line.to_string(), "$10.01");
    }

    #[test]
    fn test_times_and_sum_are_exact() {
        let dime = Price::from_cents(10);
        let total: Price = [dime.times(3), Price::from_cents(20)].into_iter().sum();
        assert_eq!(total, Price::from_cents(50));
    }

    #[test]
    fn test_json_number_round_trip() {
        let price: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(price, Price::from_cents(1250));
        assert_eq!(serde_json::to_string(&price).unwrap(), "12.5");

        let whole: Price = serde_json::from_str("10").unwrap();
        assert_eq!(whole.to_string(), "$10.00");
    }

    #[test]
    fn test_negative_json_price_rejected() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
    }
}
