//! Error taxonomy
//!
//! Every failure is reported through return values; the engine never
//! unwinds across its public surface. The `Display` strings are stable:
//! the gateway forwards them to clients verbatim and tests assert on
//! them.

use thiserror::Error;

/// Engine-level errors surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Instrument not found")]
    InstrumentNotFound,

    #[error("Instrument is halted")]
    InstrumentHalted,

    #[error("Instrument already exists")]
    DuplicateInstrument,

    #[error("Reference instrument not found")]
    ReferenceNotFound,

    #[error("Risk limit exceeded")]
    RiskLimitExceeded,

    #[error("Invalid quantity")]
    InvalidQuantity,

    #[error("Invalid price")]
    InvalidPrice,

    #[error("Order not found")]
    OrderNotFound,

    #[error("Not the order owner")]
    NotOrderOwner,
}
