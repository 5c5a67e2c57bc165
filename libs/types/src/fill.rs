//! Fill events
//!
//! One fill per side of every matched slice. Fills are emitted in pairs,
//! aggressor first then passive, both carrying the passive order's price
//! and the same quantity and timestamp.

use crate::ids::{InstrumentId, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::Side;
use serde::{Deserialize, Serialize};

/// A single-side execution report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    /// Logical sequence number of the matching call that produced this fill
    pub timestamp: u64,
}

impl Fill {
    pub fn new(
        order_id: OrderId,
        user_id: UserId,
        instrument_id: InstrumentId,
        side: Side,
        price: Price,
        quantity: Quantity,
        timestamp: u64,
    ) -> Self {
        Self {
            order_id,
            user_id,
            instrument_id,
            side,
            price,
            quantity,
            timestamp,
        }
    }

    /// Signed quantity: positive for buys, negative for sells
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.quantity.as_i64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_quantity() {
        let buy = Fill::new(
            OrderId::new(1),
            UserId::new(1),
            InstrumentId::new(1),
            Side::Buy,
            Price::new(10000),
            Quantity::new(50),
            1,
        );
        assert_eq!(buy.signed_quantity(), 50);

        let sell = Fill { side: Side::Sell, ..buy };
        assert_eq!(sell.signed_quantity(), -50);
    }
}
