//! Ask (sell-side) book
//!
//! Sell orders keyed by price; the best ask is the lowest price.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::Price;
use types::snapshot::LevelView;

use super::price_level::PriceLevel;

/// Sell side of one instrument's book
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an order at its price level, creating the level on demand
    pub fn insert(&mut self, price: Price, order_id: OrderId, open_qty: i64) {
        self.levels
            .entry(price)
            .or_default()
            .append(order_id, open_qty);
    }

    /// Remove a resting order; deletes the level if it empties
    pub fn remove(&mut self, order_id: OrderId, price: Price, open_qty: i64) -> bool {
        if let Some(level) = self.levels.get_mut(&price) {
            if level.remove(order_id, open_qty) {
                if level.is_empty() {
                    self.levels.remove(&price);
                }
                return true;
            }
        }
        false
    }

    /// Best ask price (lowest key)
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Mutable access to the best level for the matching loop
    pub fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
            .map(|(price, level)| (*price, level))
    }

    /// Drop an emptied level
    pub fn remove_level(&mut self, price: Price) {
        debug_assert!(
            self.levels.get(&price).map_or(true, PriceLevel::is_empty),
            "removing a level that still has orders"
        );
        self.levels.remove(&price);
    }

    /// Top `depth` levels, best first
    pub fn depth_snapshot(&self, depth: usize) -> Vec<LevelView> {
        self.levels
            .iter()
            .take(depth)
            .map(|(price, level)| LevelView::new(*price, level.open_size()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Ids at one price in time priority, if the level exists
    pub fn level_orders(&self, price: Price) -> Option<Vec<OrderId>> {
        self.levels.get(&price).map(|l| l.iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_is_lowest_price() {
        let mut book = AskBook::new();
        book.insert(Price::new(10000), OrderId::new(1), 10);
        book.insert(Price::new(10200), OrderId::new(2), 20);
        book.insert(Price::new(10100), OrderId::new(3), 15);

        assert_eq!(book.best_price(), Some(Price::new(10000)));
    }

    #[test]
    fn test_depth_snapshot_ascending() {
        let mut book = AskBook::new();
        book.insert(Price::new(10300), OrderId::new(1), 10);
        book.insert(Price::new(10100), OrderId::new(2), 20);
        book.insert(Price::new(10200), OrderId::new(3), 15);

        let depth = book.depth_snapshot(2);
        assert_eq!(depth[0], LevelView::new(Price::new(10100), 20));
        assert_eq!(depth[1], LevelView::new(Price::new(10200), 15));
    }

    #[test]
    fn test_remove_deletes_empty_level() {
        let mut book = AskBook::new();
        book.insert(Price::new(10000), OrderId::new(1), 10);
        assert!(book.remove(OrderId::new(1), Price::new(10000), 10));
        assert!(book.is_empty());
    }
}
