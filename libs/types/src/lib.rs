//! Shared value types for the market-making game engine
//!
//! Everything that crosses the engine boundary lives here: identifiers,
//! fixed-point numerics, instruments, orders, fills, trade records,
//! positions, risk limits, snapshots, and the error taxonomy.

pub mod errors;
pub mod fill;
pub mod ids;
pub mod instrument;
pub mod numeric;
pub mod order;
pub mod position;
pub mod risk;
pub mod snapshot;
pub mod trade;

pub use errors::EngineError;
pub use fill::Fill;
pub use ids::{InstrumentId, OrderId, UserId};
pub use instrument::{Instrument, InstrumentKind};
pub use numeric::{Price, Quantity, PRICE_SCALE};
pub use order::{Order, OrderRequest, OrderStatus, Side, TimeInForce};
pub use position::Position;
pub use risk::{RiskCheckResult, RiskLimits};
pub use snapshot::{LevelView, MarketSnapshot};
pub use trade::TradeRecord;
