//! Order-id and logical-timestamp allocation
//!
//! Two monotonic counters: order ids start at 1 and are never reused;
//! timestamps are a logical clock ticked once per accepted order, and are
//! the only thing that governs FIFO priority within a price level.

use types::ids::OrderId;

/// Monotonic id/timestamp source for one engine instance
#[derive(Debug)]
pub struct Sequencer {
    next_order_id: u64,
    next_timestamp: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            next_order_id: 1,
            next_timestamp: 1,
        }
    }

    /// Allocate the next order id
    pub fn next_order_id(&mut self) -> OrderId {
        let id = OrderId::new(self.next_order_id);
        self.next_order_id += 1;
        id
    }

    /// Tick the logical clock
    pub fn next_timestamp(&mut self) -> u64 {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        ts
    }

    /// Current logical time without ticking (for read-only snapshots)
    pub fn current_timestamp(&self) -> u64 {
        self.next_timestamp - 1
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
