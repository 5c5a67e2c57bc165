//! Engine façade
//!
//! The single entry point the gateway talks to: instrument registry,
//! order submission pipeline, cancellation and replacement, settlement,
//! risk limits, market data, positions and session statistics. One engine
//! instance serializes everything; callers that need concurrency wrap it
//! in a lock or feed it from a single-consumer command queue.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use types::errors::EngineError;
use types::fill::Fill;
use types::ids::{InstrumentId, OrderId, UserId};
use types::instrument::{Instrument, InstrumentKind};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderRequest, OrderStatus, Side};
use types::position::Position;
use types::risk::RiskLimits;
use types::snapshot::MarketSnapshot;
use types::trade::TradeRecord;

use crate::book::{AddOrderResult, OrderBook};
use crate::config::EngineConfig;
use crate::ledger::PositionLedger;
use crate::risk::RiskGate;
use crate::sequence::Sequencer;

/// Result of one order submission
///
/// `success` reports pipeline acceptance: a post-only reject or an IOC
/// leftover cancel still counts as accepted, with the disposition in
/// `status`. Validation failures carry the error string and no order id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResult {
    pub order_id: Option<OrderId>,
    pub success: bool,
    pub error_message: Option<String>,
    pub status: Option<OrderStatus>,
    /// Fills in pair order: aggressor then passive per matched slice
    pub fills: Vec<Fill>,
}

impl OrderResult {
    fn rejected(err: EngineError) -> Self {
        Self {
            order_id: None,
            success: false,
            error_message: Some(err.to_string()),
            status: None,
            fills: Vec::new(),
        }
    }
}

/// Monotonic session counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_orders_accepted: u64,
    pub total_fills_emitted: u64,
    pub total_cancels: u64,
    pub total_rejects: u64,
}

/// The matching engine
pub struct Engine {
    config: EngineConfig,
    sequencer: Sequencer,

    instruments: BTreeMap<InstrumentId, Instrument>,
    books: BTreeMap<InstrumentId, OrderBook>,

    ledger: PositionLedger,
    risk: RiskGate,

    /// Live orders: id → owning instrument (the book owns the record)
    active_orders: HashMap<OrderId, InstrumentId>,
    /// Live orders per user, for cancel-all
    user_orders: BTreeMap<UserId, BTreeSet<OrderId>>,

    fill_history: Vec<Fill>,
    trade_history: Vec<TradeRecord>,
    stats: Stats,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            config,
            sequencer: Sequencer::new(),
            instruments: BTreeMap::new(),
            books: BTreeMap::new(),
            ledger: PositionLedger::new(),
            risk: RiskGate::new(),
            active_orders: HashMap::new(),
            user_orders: BTreeMap::new(),
            fill_history: Vec::new(),
            trade_history: Vec::new(),
            stats: Stats::default(),
        }
    }

    // ------------------------------------------------------------------
    // Instrument registry
    // ------------------------------------------------------------------

    /// Register an instrument and open its book.
    ///
    /// Duplicate ids are refused without mutation; a CALL or PUT must
    /// reference an already-registered SCALAR.
    pub fn add_instrument(&mut self, instrument: Instrument) -> Result<(), EngineError> {
        if self.instruments.contains_key(&instrument.id) {
            return Err(EngineError::DuplicateInstrument);
        }
        if !instrument.tick_size.is_positive() {
            return Err(EngineError::InvalidPrice);
        }
        if instrument.kind.is_option() {
            match self.instruments.get(&instrument.reference_id) {
                Some(underlying) if underlying.kind == InstrumentKind::Scalar => {}
                _ => return Err(EngineError::ReferenceNotFound),
            }
        }

        info!(id = %instrument.id, symbol = %instrument.symbol, "instrument registered");
        self.books.insert(instrument.id, OrderBook::new(instrument.id));
        self.instruments.insert(instrument.id, instrument);
        Ok(())
    }

    /// Toggle the halt flag; a halted instrument keeps its book intact
    pub fn halt_instrument(&mut self, id: InstrumentId, halted: bool) -> Result<(), EngineError> {
        let instrument = self
            .instruments
            .get_mut(&id)
            .ok_or(EngineError::InstrumentNotFound)?;
        instrument.is_halted = halted;
        info!(%id, halted, "instrument halt toggled");
        Ok(())
    }

    pub fn get_instrument(&self, id: InstrumentId) -> Option<Instrument> {
        self.instruments.get(&id).cloned()
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Submit an order through the full pipeline: validation, risk gate,
    /// id allocation, matching, position and history updates.
    pub fn submit_order(&mut self, request: &OrderRequest) -> OrderResult {
        if let Err(err) = self.validate(request) {
            self.stats.total_rejects += 1;
            debug!(
                user = %request.user_id,
                instrument = %request.instrument_id,
                %err,
                "order rejected"
            );
            return OrderResult::rejected(err);
        }

        let order_id = self.sequencer.next_order_id();
        let timestamp = self.sequencer.next_timestamp();
        let order = Order::from_request(order_id, request, timestamp);

        let book = self
            .books
            .get_mut(&request.instrument_id)
            .expect("validated instrument has a book");
        let AddOrderResult { status, fills } = book.add_order(order);

        if status == OrderStatus::Rejected {
            // Post-only would have crossed
            self.stats.total_rejects += 1;
        }

        for pair in fills.chunks_exact(2) {
            self.ledger.apply_fill(&pair[0]);
            self.ledger.apply_fill(&pair[1]);
            self.trade_history
                .push(TradeRecord::from_fill_pair(&pair[0], &pair[1]));
            self.fill_history.extend_from_slice(pair);
            self.stats.total_fills_emitted += 2;
        }

        if status.is_live() {
            self.active_orders.insert(order_id, request.instrument_id);
            self.user_orders
                .entry(request.user_id)
                .or_default()
                .insert(order_id);
        }

        self.stats.total_orders_accepted += 1;
        debug!(
            %order_id,
            user = %request.user_id,
            ?status,
            fills = fills.len(),
            "order processed"
        );

        OrderResult {
            order_id: Some(order_id),
            success: true,
            error_message: None,
            status: Some(status),
            fills,
        }
    }

    fn validate(&self, request: &OrderRequest) -> Result<(), EngineError> {
        let instrument = self
            .instruments
            .get(&request.instrument_id)
            .ok_or(EngineError::InstrumentNotFound)?;
        if instrument.is_halted {
            return Err(EngineError::InstrumentHalted);
        }
        if !request.quantity.is_multiple_of(instrument.lot_size) {
            return Err(EngineError::InvalidQuantity);
        }
        if !request.price.is_multiple_of(instrument.tick_size) {
            return Err(EngineError::InvalidPrice);
        }

        let net = self.ledger.net_qty(request.user_id, request.instrument_id);
        if !self
            .risk
            .check(request.user_id, net, request.side, request.quantity)
            .is_pass()
        {
            return Err(EngineError::RiskLimitExceeded);
        }

        Ok(())
    }

    /// Cancel a live order; only its owner may do so
    pub fn cancel_order(&mut self, order_id: OrderId, user_id: UserId) -> Result<(), EngineError> {
        let instrument_id = *self
            .active_orders
            .get(&order_id)
            .ok_or(EngineError::OrderNotFound)?;
        let book = self
            .books
            .get_mut(&instrument_id)
            .expect("active order maps to a registered book");
        let owner = book
            .order(order_id)
            .map(|o| o.user_id)
            .ok_or(EngineError::OrderNotFound)?;
        if owner != user_id {
            return Err(EngineError::NotOrderOwner);
        }

        book.cancel_order(order_id)
            .expect("owner lookup found the order in its book");
        self.forget_order(order_id, user_id);
        self.stats.total_cancels += 1;
        debug!(%order_id, user = %user_id, "order cancelled");
        Ok(())
    }

    /// Cancel every live order belonging to a user, across all books.
    ///
    /// Returns the number cancelled.
    pub fn cancel_all(&mut self, user_id: UserId) -> usize {
        let ids: Vec<OrderId> = self
            .user_orders
            .get(&user_id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();

        let mut cancelled = 0;
        for order_id in ids {
            if self.cancel_order(order_id, user_id).is_ok() {
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Cancel-then-resubmit with optional new price and quantity.
    ///
    /// The replacement defaults to the old order's remaining quantity and
    /// unchanged price, keeps its TIF and post-only flag, and goes to the
    /// tail of its level: queue priority is deliberately given up.
    pub fn replace_order(
        &mut self,
        order_id: OrderId,
        user_id: UserId,
        new_price: Option<Price>,
        new_qty: Option<Quantity>,
    ) -> OrderResult {
        let Some(&instrument_id) = self.active_orders.get(&order_id) else {
            return OrderResult::rejected(EngineError::OrderNotFound);
        };
        let old = match self
            .books
            .get(&instrument_id)
            .and_then(|book| book.order(order_id))
        {
            Some(order) => order.clone(),
            None => return OrderResult::rejected(EngineError::OrderNotFound),
        };
        if old.user_id != user_id {
            return OrderResult::rejected(EngineError::NotOrderOwner);
        }
        if let Err(err) = self.cancel_order(order_id, user_id) {
            return OrderResult::rejected(err);
        }

        let request = OrderRequest {
            user_id,
            instrument_id,
            side: old.side,
            price: new_price.unwrap_or(old.price),
            quantity: new_qty.unwrap_or_else(|| Quantity::new(old.remaining())),
            tif: old.tif,
            post_only: old.post_only,
        };
        self.submit_order(&request)
    }

    // ------------------------------------------------------------------
    // Settlement
    // ------------------------------------------------------------------

    /// Settle an instrument against a declared value.
    ///
    /// Every open position converts to realized cash per the instrument's
    /// payoff, the instrument halts, and its resting orders are flushed so
    /// nothing dangles against a dead book.
    pub fn settle_instrument(
        &mut self,
        id: InstrumentId,
        settlement_value: Price,
    ) -> Result<(), EngineError> {
        let (payoff, tick_value) = {
            let instrument = self
                .instruments
                .get(&id)
                .ok_or(EngineError::InstrumentNotFound)?;
            (
                instrument.settlement_payoff(settlement_value),
                instrument.tick_value,
            )
        };

        self.ledger.settle_instrument(id, payoff, tick_value);
        if let Some(instrument) = self.instruments.get_mut(&id) {
            instrument.is_halted = true;
        }

        let flushed = self
            .books
            .get_mut(&id)
            .expect("registered instrument has a book")
            .flush();
        for order in &flushed {
            self.forget_order(order.id, order.user_id);
        }

        info!(
            %id,
            settlement = %settlement_value,
            flushed = flushed.len(),
            "instrument settled"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Risk
    // ------------------------------------------------------------------

    pub fn set_risk_limits(&mut self, user_id: UserId, limits: RiskLimits) {
        self.risk.set_limits(user_id, limits);
    }

    /// Pre-flight check: would this submission pass the position cap?
    pub fn check_risk(
        &self,
        user_id: UserId,
        instrument_id: InstrumentId,
        side: Side,
        quantity: Quantity,
    ) -> bool {
        let net = self.ledger.net_qty(user_id, instrument_id);
        self.risk.check(user_id, net, side, quantity).is_pass()
    }

    // ------------------------------------------------------------------
    // Market data, positions, statistics
    // ------------------------------------------------------------------

    pub fn get_snapshot(&self, id: InstrumentId) -> Option<MarketSnapshot> {
        self.books.get(&id).map(|book| {
            book.snapshot(self.config.snapshot_depth, self.sequencer.current_timestamp())
        })
    }

    /// Live orders for an instrument, oldest first (value copies)
    pub fn get_orders(&self, id: InstrumentId) -> Vec<Order> {
        self.books
            .get(&id)
            .map(|book| book.live_orders())
            .unwrap_or_default()
    }

    /// Open positions with unrealized P&L marked in
    pub fn get_positions(&self, user_id: UserId) -> Vec<Position> {
        self.ledger.open_positions(user_id, |instrument_id| {
            self.books
                .get(&instrument_id)
                .and_then(OrderBook::mark_price)
        })
    }

    /// Realized plus unrealized P&L across every instrument
    pub fn get_total_pnl(&self, user_id: UserId) -> Decimal {
        self.ledger.total_pnl(user_id, |instrument_id| {
            self.books
                .get(&instrument_id)
                .and_then(OrderBook::mark_price)
        })
    }

    pub fn get_stats(&self) -> Stats {
        self.stats
    }

    /// Every trade this session, oldest first (value copies)
    pub fn get_trade_history(&self) -> Vec<TradeRecord> {
        self.trade_history.clone()
    }

    /// Every fill this session, in emission order (value copies)
    pub fn get_fill_history(&self) -> Vec<Fill> {
        self.fill_history.clone()
    }

    // ------------------------------------------------------------------

    fn forget_order(&mut self, order_id: OrderId, user_id: UserId) {
        self.active_orders.remove(&order_id);
        if let Some(set) = self.user_orders.get_mut(&user_id) {
            set.remove(&order_id);
            if set.is_empty() {
                self.user_orders.remove(&user_id);
            }
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
