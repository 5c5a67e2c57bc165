//! Fixed-point numeric types for prices and quantities
//!
//! Prices are signed integers in the instrument's smallest unit; a single
//! scaling constant converts to dollar values for payoff and P&L
//! arithmetic, which is done in `rust_decimal` so money math stays exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Number of price units per dollar
pub const PRICE_SCALE: i64 = 100;

/// Price in fixed-point units (e.g. cents)
///
/// Signed: settlement values and scalar marks may legitimately be
/// negative. Ordering is the natural integer ordering, which makes the
/// book's `BTreeMap` keys sort by price.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn new(units: i64) -> Self {
        Self(units)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Whether this price sits on the instrument's tick grid
    pub fn is_multiple_of(&self, tick_size: Price) -> bool {
        tick_size.0 > 0 && self.0 % tick_size.0 == 0
    }

    /// Exact conversion to dollars (two decimal places at scale 100)
    pub fn to_dollars(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(PRICE_SCALE)
    }

    /// Midpoint of two prices, truncating toward zero
    pub fn mid(a: Price, b: Price) -> Price {
        Price((a.0 + b.0) / 2)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order quantity in lots
///
/// Always strictly positive on construction; direction lives in
/// [`crate::order::Side`], and signed arithmetic only appears inside
/// position math on raw `i64` values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Create a new quantity
    ///
    /// # Panics
    /// Panics if the quantity is zero or negative
    pub fn new(value: i64) -> Self {
        assert!(value > 0, "Quantity must be positive");
        Self(value)
    }

    /// Try to create a quantity, returning None if not strictly positive
    pub fn try_new(value: i64) -> Option<Self> {
        if value > 0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether this quantity is a whole number of lots
    pub fn is_multiple_of(&self, lot_size: Quantity) -> bool {
        self.0 % lot_size.0 == 0
    }

    pub fn min(self, other: Quantity) -> Quantity {
        Quantity(self.0.min(other.0))
    }

    pub fn to_decimal(&self) -> Decimal {
        Decimal::from(self.0)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_to_dollars_exact() {
        assert_eq!(Price::new(10000).to_dollars(), Decimal::from(100));
        assert_eq!(Price::new(10050).to_dollars(), Decimal::new(10050, 2));
        assert_eq!(Price::new(-500).to_dollars(), Decimal::from(-5));
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::new(9900) < Price::new(10000));
        assert!(Price::new(-100) < Price::new(0));
    }

    #[test]
    fn test_price_mid_truncates() {
        assert_eq!(Price::mid(Price::new(100), Price::new(200)), Price::new(150));
        assert_eq!(Price::mid(Price::new(100), Price::new(101)), Price::new(100));
    }

    #[test]
    fn test_price_tick_multiple() {
        assert!(Price::new(10000).is_multiple_of(Price::new(100)));
        assert!(!Price::new(10050).is_multiple_of(Price::new(100)));
        // A non-positive tick never validates anything
        assert!(!Price::new(10000).is_multiple_of(Price::new(0)));
    }

    #[test]
    #[should_panic(expected = "Quantity must be positive")]
    fn test_quantity_zero_panics() {
        Quantity::new(0);
    }

    #[test]
    fn test_quantity_try_new() {
        assert!(Quantity::try_new(10).is_some());
        assert!(Quantity::try_new(0).is_none());
        assert!(Quantity::try_new(-5).is_none());
    }

    #[test]
    fn test_quantity_min() {
        let a = Quantity::new(50);
        let b = Quantity::new(100);
        assert_eq!(a.min(b), a);
        assert_eq!(b.min(a), a);
    }

    #[test]
    fn test_quantity_lot_multiple() {
        assert!(Quantity::new(100).is_multiple_of(Quantity::new(10)));
        assert!(!Quantity::new(105).is_multiple_of(Quantity::new(10)));
    }

    #[test]
    fn test_serialization_as_plain_integers() {
        let p = Price::new(10000);
        assert_eq!(serde_json::to_string(&p).unwrap(), "10000");

        let q: Quantity = serde_json::from_str("25").unwrap();
        assert_eq!(q, Quantity::new(25));
    }
}
