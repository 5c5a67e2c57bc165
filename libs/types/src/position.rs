//! Position tracking
//!
//! A position is the running net quantity a user holds in one instrument,
//! the volume-weighted average price of the fills that built it, and the
//! P&L realized so far. Unrealized P&L is derived from a mark price on
//! query, never authoritative.

use crate::ids::InstrumentId;
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-user, per-instrument position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub instrument_id: InstrumentId,
    /// Signed net quantity; positive = long
    pub net_qty: i64,
    /// Entry VWAP in price units; 0 when flat
    pub vwap: Price,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
}

impl Position {
    pub fn new(instrument_id: InstrumentId) -> Self {
        Self {
            instrument_id,
            net_qty: 0,
            vwap: Price::zero(),
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
        }
    }

    pub fn is_open(&self) -> bool {
        self.net_qty != 0
    }

    /// Equivalent to never having traded: nothing to enumerate or settle
    pub fn is_empty(&self) -> bool {
        self.net_qty == 0 && self.realized_pnl == Decimal::ZERO
    }

    /// Apply one fill to the position.
    ///
    /// Three cases: opening from flat takes the fill price as VWAP;
    /// adding to the position blends VWAP by quantity; reducing realizes
    /// `(exit − entry) · closed · sign(prior position)` and, on a flip
    /// through zero, re-bases VWAP at the fill price.
    pub fn apply_fill(&mut self, side: Side, price: Price, quantity: Quantity) {
        let q = quantity.as_i64();
        let delta = side.sign() * q;
        let prior = self.net_qty;

        if prior == 0 {
            self.net_qty = delta;
            self.vwap = price;
            return;
        }

        if prior.signum() == delta.signum() {
            // Same direction: blend VWAP, quantity-weighted
            let abs_prior = prior.abs();
            let blended =
                (self.vwap.as_i64() * abs_prior + price.as_i64() * q) / (abs_prior + q);
            self.vwap = Price::new(blended);
            self.net_qty = prior + delta;
            return;
        }

        // Opposite direction: realize P&L on the closing portion
        let closed = prior.abs().min(q);
        let per_unit = (price - self.vwap).to_dollars();
        self.realized_pnl += per_unit * Decimal::from(closed * prior.signum());

        self.net_qty = prior + delta;
        if self.net_qty == 0 {
            self.vwap = Price::zero();
        } else if self.net_qty.signum() != prior.signum() {
            // Flipped through zero: the fill price opens the new side
            self.vwap = price;
        }
    }

    /// Unrealized P&L against a mark price, in dollars
    pub fn unrealized_at(&self, mark: Price) -> Decimal {
        if self.net_qty == 0 {
            return Decimal::ZERO;
        }
        (mark - self.vwap).to_dollars() * Decimal::from(self.net_qty)
    }

    /// Refresh the stored unrealized P&L from a mark, if one exists
    pub fn mark_to_market(&mut self, mark: Option<Price>) {
        self.unrealized_pnl = match mark {
            Some(m) => self.unrealized_at(m),
            None => Decimal::ZERO,
        };
    }

    /// Convert the open quantity into realized cash at settlement.
    ///
    /// `payoff_per_unit` already includes the tick value; the cost basis
    /// is the entry VWAP in dollars times the same tick value.
    pub fn settle(&mut self, payoff_per_unit: Decimal, tick_value: Decimal) {
        if self.net_qty == 0 {
            return;
        }
        let basis_per_unit = self.vwap.to_dollars() * tick_value;
        self.realized_pnl += (payoff_per_unit - basis_per_unit) * Decimal::from(self.net_qty);
        self.net_qty = 0;
        self.vwap = Price::zero();
        self.unrealized_pnl = Decimal::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Position {
        Position::new(InstrumentId::new(1))
    }

    #[test]
    fn test_open_from_flat() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        assert_eq!(p.net_qty, 100);
        assert_eq!(p.vwap, Price::new(10000));
        assert_eq!(p.realized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_open_short_from_flat() {
        let mut p = pos();
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(40));
        assert_eq!(p.net_qty, -40);
        assert_eq!(p.vwap, Price::new(10000));
    }

    #[test]
    fn test_vwap_blends_on_add() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        p.apply_fill(Side::Buy, Price::new(11000), Quantity::new(100));
        assert_eq!(p.net_qty, 200);
        assert_eq!(p.vwap, Price::new(10500));
        assert_eq!(p.realized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_close_long_realizes_profit() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        p.apply_fill(Side::Sell, Price::new(10500), Quantity::new(100));
        assert_eq!(p.net_qty, 0);
        assert_eq!(p.vwap, Price::zero());
        // (105.00 − 100.00) · 100
        assert_eq!(p.realized_pnl, Decimal::from(500));
    }

    #[test]
    fn test_close_short_realizes_profit_on_drop() {
        let mut p = pos();
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(100));
        p.apply_fill(Side::Buy, Price::new(9000), Quantity::new(100));
        // Short from 100.00 bought back at 90.00 → +10.00 per unit
        assert_eq!(p.realized_pnl, Decimal::from(1000));
        assert_eq!(p.net_qty, 0);
    }

    #[test]
    fn test_partial_close_keeps_vwap() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        p.apply_fill(Side::Sell, Price::new(10200), Quantity::new(40));
        assert_eq!(p.net_qty, 60);
        assert_eq!(p.vwap, Price::new(10000));
        assert_eq!(p.realized_pnl, Decimal::from(80));
    }

    #[test]
    fn test_flip_rebases_vwap_at_fill_price() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        p.apply_fill(Side::Sell, Price::new(10500), Quantity::new(150));
        // 100 closed at +5.00 each, 50 newly short from 105.00
        assert_eq!(p.net_qty, -50);
        assert_eq!(p.vwap, Price::new(10500));
        assert_eq!(p.realized_pnl, Decimal::from(500));
    }

    #[test]
    fn test_flip_short_to_long() {
        let mut p = pos();
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(50));
        p.apply_fill(Side::Buy, Price::new(10100), Quantity::new(80));
        // 50 bought back at a 1.00 loss each, 30 newly long from 101.00
        assert_eq!(p.net_qty, 30);
        assert_eq!(p.vwap, Price::new(10100));
        assert_eq!(p.realized_pnl, Decimal::from(-50));
    }

    #[test]
    fn test_unrealized_long() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        assert_eq!(p.unrealized_at(Price::new(10300)), Decimal::from(300));
        assert_eq!(p.unrealized_at(Price::new(9900)), Decimal::from(-100));
    }

    #[test]
    fn test_unrealized_short() {
        let mut p = pos();
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(100));
        assert_eq!(p.unrealized_at(Price::new(9500)), Decimal::from(500));
    }

    #[test]
    fn test_mark_to_market_without_mark() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(10));
        p.mark_to_market(None);
        assert_eq!(p.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_settle_long() {
        let mut p = pos();
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(100));
        // Settles at 110.00 per unit with tick value 1
        p.settle(Decimal::from(110), Decimal::ONE);
        assert_eq!(p.realized_pnl, Decimal::from(1000));
        assert_eq!(p.net_qty, 0);
        assert_eq!(p.unrealized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_settle_short_pays_inverse() {
        let mut p = pos();
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(100));
        p.settle(Decimal::from(110), Decimal::ONE);
        assert_eq!(p.realized_pnl, Decimal::from(-1000));
    }

    #[test]
    fn test_settle_flat_is_noop() {
        let mut p = pos();
        p.settle(Decimal::from(110), Decimal::ONE);
        assert_eq!(p.realized_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_empty_equivalence() {
        let mut p = pos();
        assert!(p.is_empty());
        p.apply_fill(Side::Buy, Price::new(10000), Quantity::new(10));
        assert!(!p.is_empty());
        p.apply_fill(Side::Sell, Price::new(10000), Quantity::new(10));
        // Flat with zero realized P&L counts as empty again
        assert!(p.is_empty());
    }
}
