//! Per-instrument order book
//!
//! One book per instrument: a bid side and an ask side of price levels,
//! plus an arena of the resting order records keyed by id. Levels hold
//! only order ids, so cancellation is a level lookup plus a queue splice
//! and never needs shared ownership of the records.
//!
//! Matching follows price-time priority: an incoming order sweeps the
//! opposite side from the best price outward, filling each level's queue
//! head first. Every matched slice emits two fills, aggressor first, both
//! at the passive order's price.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

use std::collections::HashMap;

use types::fill::Fill;
use types::ids::{InstrumentId, OrderId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderStatus, Side, TimeInForce};
use types::snapshot::MarketSnapshot;

use crate::matching::crossing;
use ask_book::AskBook;
use bid_book::BidBook;

/// Outcome of submitting one order to the book
#[derive(Debug, Clone)]
pub struct AddOrderResult {
    /// Final status of the incoming order after matching and disposition
    pub status: OrderStatus,
    /// Fills in pair order: aggressor then passive, per matched slice
    pub fills: Vec<Fill>,
}

/// Single-instrument limit order book
#[derive(Debug)]
pub struct OrderBook {
    instrument_id: InstrumentId,
    bids: BidBook,
    asks: AskBook,
    /// Resting orders by id; the single owner of live order records
    orders: HashMap<OrderId, Order>,
    last_price: Option<Price>,
}

impl OrderBook {
    pub fn new(instrument_id: InstrumentId) -> Self {
        Self {
            instrument_id,
            bids: BidBook::new(),
            asks: AskBook::new(),
            orders: HashMap::new(),
            last_price: None,
        }
    }

    pub fn instrument_id(&self) -> InstrumentId {
        self.instrument_id
    }

    /// Match an incoming order, then rest, cancel or reject the residual.
    ///
    /// Post-only orders are atomic: if the limit crosses the opposite best
    /// price the order is rejected before any passive state changes, and
    /// the returned fill list is empty.
    pub fn add_order(&mut self, mut order: Order) -> AddOrderResult {
        let fills = match order.side {
            Side::Buy => Self::match_against_asks(
                &mut self.orders,
                &mut self.asks,
                &mut order,
                &mut self.last_price,
            ),
            Side::Sell => Self::match_against_bids(
                &mut self.orders,
                &mut self.bids,
                &mut order,
                &mut self.last_price,
            ),
        };

        if order.status == OrderStatus::Rejected {
            return AddOrderResult {
                status: OrderStatus::Rejected,
                fills: Vec::new(),
            };
        }

        if order.is_filled() {
            return AddOrderResult {
                status: OrderStatus::Filled,
                fills,
            };
        }

        if order.tif == TimeInForce::Ioc {
            // Leftover never rests
            order.cancel();
            return AddOrderResult {
                status: OrderStatus::Cancelled,
                fills,
            };
        }

        let status = if order.has_fills() {
            OrderStatus::Partial
        } else {
            OrderStatus::Pending
        };
        order.status = status;

        let open = order.remaining();
        match order.side {
            Side::Buy => self.bids.insert(order.price, order.id, open),
            Side::Sell => self.asks.insert(order.price, order.id, open),
        }
        self.orders.insert(order.id, order);

        AddOrderResult { status, fills }
    }

    /// Sweep the ask side with an incoming buy
    fn match_against_asks(
        orders: &mut HashMap<OrderId, Order>,
        asks: &mut AskBook,
        order: &mut Order,
        last_price: &mut Option<Price>,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();

        while order.remaining() > 0 {
            let Some((level_price, level)) = asks.best_level_mut() else {
                break;
            };
            if !crossing::incoming_can_match(order.side, order.price, level_price) {
                break;
            }
            if order.post_only {
                order.status = OrderStatus::Rejected;
                return fills;
            }

            while order.remaining() > 0 {
                let Some(passive_id) = level.front() else {
                    break;
                };
                let passive = orders
                    .get_mut(&passive_id)
                    .expect("level queue references an order missing from the arena");

                let qty = Quantity::new(order.remaining().min(passive.remaining()));
                fills.push(Fill::new(
                    order.id,
                    order.user_id,
                    order.instrument_id,
                    order.side,
                    level_price,
                    qty,
                    order.timestamp,
                ));
                fills.push(Fill::new(
                    passive.id,
                    passive.user_id,
                    passive.instrument_id,
                    passive.side,
                    level_price,
                    qty,
                    order.timestamp,
                ));

                order.add_fill(qty);
                passive.add_fill(qty);
                level.reduce(qty.as_i64());
                *last_price = Some(level_price);

                if passive.is_filled() {
                    level.pop_front();
                    orders.remove(&passive_id);
                }
            }

            if level.is_empty() {
                asks.remove_level(level_price);
            }
        }

        fills
    }

    /// Sweep the bid side with an incoming sell
    fn match_against_bids(
        orders: &mut HashMap<OrderId, Order>,
        bids: &mut BidBook,
        order: &mut Order,
        last_price: &mut Option<Price>,
    ) -> Vec<Fill> {
        let mut fills = Vec::new();

        while order.remaining() > 0 {
            let Some((level_price, level)) = bids.best_level_mut() else {
                break;
            };
            if !crossing::incoming_can_match(order.side, order.price, level_price) {
                break;
            }
            if order.post_only {
                order.status = OrderStatus::Rejected;
                return fills;
            }

            while order.remaining() > 0 {
                let Some(passive_id) = level.front() else {
                    break;
                };
                let passive = orders
                    .get_mut(&passive_id)
                    .expect("level queue references an order missing from the arena");

                let qty = Quantity::new(order.remaining().min(passive.remaining()));
                fills.push(Fill::new(
                    order.id,
                    order.user_id,
                    order.instrument_id,
                    order.side,
                    level_price,
                    qty,
                    order.timestamp,
                ));
                fills.push(Fill::new(
                    passive.id,
                    passive.user_id,
                    passive.instrument_id,
                    passive.side,
                    level_price,
                    qty,
                    order.timestamp,
                ));

                order.add_fill(qty);
                passive.add_fill(qty);
                level.reduce(qty.as_i64());
                *last_price = Some(level_price);

                if passive.is_filled() {
                    level.pop_front();
                    orders.remove(&passive_id);
                }
            }

            if level.is_empty() {
                bids.remove_level(level_price);
            }
        }

        fills
    }

    /// Cancel a resting order, returning its final record
    pub fn cancel_order(&mut self, order_id: OrderId) -> Option<Order> {
        let mut order = self.orders.remove(&order_id)?;
        let open = order.remaining();
        let removed = match order.side {
            Side::Buy => self.bids.remove(order_id, order.price, open),
            Side::Sell => self.asks.remove(order_id, order.price, open),
        };
        assert!(removed, "arena order missing from its price level");
        order.cancel();
        Some(order)
    }

    /// Cancel everything resting, returning the cancelled records
    pub fn flush(&mut self) -> Vec<Order> {
        let ids: Vec<OrderId> = self.orders.keys().copied().collect();
        let mut cancelled = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.cancel_order(id) {
                cancelled.push(order);
            }
        }
        cancelled
    }

    /// Look up a resting order
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    pub fn last_price(&self) -> Option<Price> {
        self.last_price
    }

    /// Mark price for valuing open positions: last trade if positive,
    /// else the bid/ask midpoint when both sides are quoted, else none.
    pub fn mark_price(&self) -> Option<Price> {
        if let Some(last) = self.last_price {
            if last.is_positive() {
                return Some(last);
            }
        }
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if bid.is_positive() && ask.is_positive() => {
                Some(Price::mid(bid, ask))
            }
            _ => None,
        }
    }

    /// Aggregated depth view, up to `depth` levels per side
    pub fn snapshot(&self, depth: usize, timestamp: u64) -> MarketSnapshot {
        MarketSnapshot {
            instrument_id: self.instrument_id,
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
            last_price: self.last_price,
            timestamp,
        }
    }

    /// Value copies of every resting order, oldest first
    pub fn live_orders(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self.orders.values().cloned().collect();
        orders.sort_by_key(|o| o.timestamp);
        orders
    }

    /// Ids resting at one price in time priority
    pub fn level_orders(&self, side: Side, price: Price) -> Option<Vec<OrderId>> {
        match side {
            Side::Buy => self.bids.level_orders(price),
            Side::Sell => self.asks.level_orders(price),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
