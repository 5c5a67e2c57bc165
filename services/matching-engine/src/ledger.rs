//! Position ledger
//!
//! Running net quantity, VWAP and realized P&L per user per instrument.
//! The ledger applies fills as they print and sweeps whole instruments at
//! settlement; unrealized P&L is derived against a mark price at query
//! time and never stored authoritatively.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use types::fill::Fill;
use types::ids::{InstrumentId, UserId};
use types::numeric::Price;
use types::position::Position;

/// All positions for a session, keyed user → instrument
#[derive(Debug, Default)]
pub struct PositionLedger {
    positions: BTreeMap<UserId, BTreeMap<InstrumentId, Position>>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one fill to its owner's position
    pub fn apply_fill(&mut self, fill: &Fill) {
        let position = self
            .positions
            .entry(fill.user_id)
            .or_default()
            .entry(fill.instrument_id)
            .or_insert_with(|| Position::new(fill.instrument_id));
        position.apply_fill(fill.side, fill.price, fill.quantity);
    }

    /// Current net quantity, zero if the user has never traded it
    pub fn net_qty(&self, user_id: UserId, instrument_id: InstrumentId) -> i64 {
        self.positions
            .get(&user_id)
            .and_then(|by_inst| by_inst.get(&instrument_id))
            .map(|p| p.net_qty)
            .unwrap_or(0)
    }

    pub fn position(&self, user_id: UserId, instrument_id: InstrumentId) -> Option<&Position> {
        self.positions
            .get(&user_id)
            .and_then(|by_inst| by_inst.get(&instrument_id))
    }

    /// Open positions (net ≠ 0) with unrealized P&L marked in
    pub fn open_positions<F>(&self, user_id: UserId, mark_price: F) -> Vec<Position>
    where
        F: Fn(InstrumentId) -> Option<Price>,
    {
        let Some(by_inst) = self.positions.get(&user_id) else {
            return Vec::new();
        };
        by_inst
            .values()
            .filter(|p| p.is_open())
            .map(|p| {
                let mut position = p.clone();
                position.mark_to_market(mark_price(position.instrument_id));
                position
            })
            .collect()
    }

    /// Realized P&L across every instrument plus unrealized on open ones.
    ///
    /// Flat positions still contribute their realized P&L.
    pub fn total_pnl<F>(&self, user_id: UserId, mark_price: F) -> Decimal
    where
        F: Fn(InstrumentId) -> Option<Price>,
    {
        let Some(by_inst) = self.positions.get(&user_id) else {
            return Decimal::ZERO;
        };
        by_inst.values().fold(Decimal::ZERO, |acc, p| {
            let unrealized = match mark_price(p.instrument_id) {
                Some(mark) if p.is_open() => p.unrealized_at(mark),
                _ => Decimal::ZERO,
            };
            acc + p.realized_pnl + unrealized
        })
    }

    /// Convert every open position in one instrument into realized cash
    pub fn settle_instrument(
        &mut self,
        instrument_id: InstrumentId,
        payoff_per_unit: Decimal,
        tick_value: Decimal,
    ) {
        for by_inst in self.positions.values_mut() {
            if let Some(position) = by_inst.get_mut(&instrument_id) {
                position.settle(payoff_per_unit, tick_value);
            }
        }
    }

    /// Users currently holding any record in an instrument
    pub fn holders(&self, instrument_id: InstrumentId) -> Vec<UserId> {
        self.positions
            .iter()
            .filter(|(_, by_inst)| by_inst.contains_key(&instrument_id))
            .map(|(user, _)| *user)
            .collect()
    }
}
