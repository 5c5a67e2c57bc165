//! Trade records
//!
//! One record per matched pair, identifying both orders and both
//! counterparties. The append-only trade history is what the gateway
//! exports at the end of a game.

use crate::fill::Fill;
use crate::ids::{InstrumentId, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// A completed trade between two orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub instrument_id: InstrumentId,
    pub price: Price,
    pub quantity: Quantity,
    pub timestamp: u64,
}

impl TradeRecord {
    /// Build a record from an (aggressor, passive) fill pair
    ///
    /// The two fills of a pair share price, quantity and timestamp and
    /// carry opposite sides; which one was the buy determines the
    /// buyer/seller assignment.
    pub fn from_fill_pair(aggressor: &Fill, passive: &Fill) -> Self {
        debug_assert_eq!(aggressor.price, passive.price);
        debug_assert_eq!(aggressor.quantity, passive.quantity);
        debug_assert_eq!(aggressor.side, passive.side.opposite());

        let (buy, sell) = match aggressor.side {
            Side::Buy => (aggressor, passive),
            Side::Sell => (passive, aggressor),
        };

        Self {
            buy_order_id: buy.order_id,
            sell_order_id: sell.order_id,
            buyer_id: buy.user_id,
            seller_id: sell.user_id,
            instrument_id: aggressor.instrument_id,
            price: aggressor.price,
            quantity: aggressor.quantity,
            timestamp: aggressor.timestamp,
        }
    }
}
