//! Market data snapshots
//!
//! Aggregated book views handed to clients. Snapshots are value copies;
//! they never alias the live book.

use crate::ids::InstrumentId;
use crate::numeric::Price;
use serde::{Deserialize, Serialize};

/// One aggregated price level: total open size across its orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelView {
    pub price: Price,
    pub size: i64,
}

impl LevelView {
    pub fn new(price: Price, size: i64) -> Self {
        Self { price, size }
    }
}

/// Top-of-book depth view for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub instrument_id: InstrumentId,
    /// Best-first (highest price first)
    pub bids: Vec<LevelView>,
    /// Best-first (lowest price first)
    pub asks: Vec<LevelView>,
    /// Most recent trade price, if any trade has printed
    pub last_price: Option<Price>,
    /// Logical sequence number at snapshot time
    pub timestamp: u64,
}

impl MarketSnapshot {
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.first().map(|l| l.price)
    }
}
