//! Order lifecycle types

use crate::ids::{InstrumentId, OrderId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// +1 for buys, −1 for sells; the sign fills carry into position math
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

/// Time-in-force policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    /// Good-for-day: rests until filled, cancelled or settled
    Gfd,
    /// Immediate-or-cancel: match on arrival, leftover never rests
    Ioc,
}

/// Order status
///
/// `Filled`, `Cancelled` and `Rejected` are terminal; a terminal order is
/// no longer present in any book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Accepted, resting, no fills yet
    Pending,
    /// Resting with partial fills
    Partial,
    /// Completely matched (terminal)
    Filled,
    /// Cancelled by user, IOC leftover, or settlement flush (terminal)
    Cancelled,
    /// Refused by the book, e.g. post-only that would cross (terminal)
    Rejected,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }

    /// Live means present in a book: pending or partially filled
    pub fn is_live(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Partial)
    }
}

/// Request payload for a new order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub user_id: UserId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub tif: TimeInForce,
    pub post_only: bool,
}

impl OrderRequest {
    pub fn new(
        user_id: UserId,
        instrument_id: InstrumentId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            user_id,
            instrument_id,
            side,
            price,
            quantity,
            tif: TimeInForce::Gfd,
            post_only: false,
        }
    }

    pub fn with_tif(mut self, tif: TimeInForce) -> Self {
        self.tif = tif;
        self
    }

    pub fn post_only(mut self) -> Self {
        self.post_only = true;
        self
    }
}

/// An accepted order
///
/// `timestamp` is the engine's logical sequence number assigned at
/// acceptance; it alone determines FIFO priority within a price level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub instrument_id: InstrumentId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub filled_quantity: i64,
    pub tif: TimeInForce,
    pub post_only: bool,
    pub status: OrderStatus,
    pub timestamp: u64,
}

impl Order {
    /// Build an order from an accepted request
    pub fn from_request(id: OrderId, request: &OrderRequest, timestamp: u64) -> Self {
        Self {
            id,
            user_id: request.user_id,
            instrument_id: request.instrument_id,
            side: request.side,
            price: request.price,
            quantity: request.quantity,
            filled_quantity: 0,
            tif: request.tif,
            post_only: request.post_only,
            status: OrderStatus::Pending,
            timestamp,
        }
    }

    /// Unfilled quantity still working
    pub fn remaining(&self) -> i64 {
        self.quantity.as_i64() - self.filled_quantity
    }

    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity.as_i64()
    }

    pub fn has_fills(&self) -> bool {
        self.filled_quantity > 0
    }

    /// Record a fill and advance status
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity; a head-of-queue
    /// order with nothing left to fill is an engine bug, not an input error.
    pub fn add_fill(&mut self, quantity: Quantity) {
        let q = quantity.as_i64();
        assert!(q <= self.remaining(), "Fill exceeds remaining quantity");

        self.filled_quantity += q;
        self.status = if self.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Partial
        };
    }

    /// Move to `Cancelled`
    ///
    /// # Panics
    /// Panics if the order is already terminal.
    pub fn cancel(&mut self) {
        assert!(!self.status.is_terminal(), "Cannot cancel terminal order");
        self.status = OrderStatus::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OrderRequest {
        OrderRequest::new(
            UserId::new(1),
            InstrumentId::new(1),
            Side::Buy,
            Price::new(10000),
            Quantity::new(100),
        )
    }

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::Buy.opposite(), Side::Sell);
        assert_eq!(Side::Sell.opposite(), Side::Buy);
    }

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::Buy.sign(), 1);
        assert_eq!(Side::Sell.sign(), -1);
    }

    #[test]
    fn test_order_from_request() {
        let order = Order::from_request(OrderId::new(1), &request(), 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.remaining(), 100);
        assert!(!order.has_fills());
    }

    #[test]
    fn test_order_fill_progression() {
        let mut order = Order::from_request(OrderId::new(1), &request(), 1);

        order.add_fill(Quantity::new(30));
        assert_eq!(order.status, OrderStatus::Partial);
        assert_eq!(order.remaining(), 70);

        order.add_fill(Quantity::new(70));
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.remaining(), 0);
        assert!(order.is_filled());
    }

    #[test]
    #[should_panic(expected = "Fill exceeds remaining quantity")]
    fn test_overfill_panics() {
        let mut order = Order::from_request(OrderId::new(1), &request(), 1);
        order.add_fill(Quantity::new(150));
    }

    #[test]
    fn test_cancel_live_order() {
        let mut order = Order::from_request(OrderId::new(1), &request(), 1);
        order.add_fill(Quantity::new(30));
        order.cancel();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.status.is_terminal());
    }

    #[test]
    #[should_panic(expected = "Cannot cancel terminal order")]
    fn test_cancel_filled_panics() {
        let mut order = Order::from_request(OrderId::new(1), &request(), 1);
        order.add_fill(Quantity::new(100));
        order.cancel();
    }

    #[test]
    fn test_status_liveness() {
        assert!(OrderStatus::Pending.is_live());
        assert!(OrderStatus::Partial.is_live());
        assert!(!OrderStatus::Rejected.is_live());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_request_builders() {
        let req = request().with_tif(TimeInForce::Ioc).post_only();
        assert_eq!(req.tif, TimeInForce::Ioc);
        assert!(req.post_only);
    }

    #[test]
    fn test_order_serialization() {
        let order = Order::from_request(OrderId::new(7), &request(), 3);
        let json = serde_json::to_string(&order).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, back);
    }
}
