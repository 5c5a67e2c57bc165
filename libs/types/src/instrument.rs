//! Instrument definitions and settlement payoffs
//!
//! Three kinds of tradable instrument: a SCALAR settles at the declared
//! value itself, a CALL or PUT settles at its intrinsic value against a
//! strike on an underlying scalar.

use crate::ids::InstrumentId;
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Instrument kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstrumentKind {
    /// Settles at the declared settlement value
    Scalar,
    /// Settles at max(settlement − strike, 0)
    Call,
    /// Settles at max(strike − settlement, 0)
    Put,
}

impl InstrumentKind {
    /// True for CALL and PUT
    pub fn is_option(&self) -> bool {
        matches!(self, InstrumentKind::Call | InstrumentKind::Put)
    }
}

/// A tradable instrument
///
/// Options carry a `reference_id` naming their underlying scalar and a
/// `strike` in price units; both are ignored for scalars. A halted
/// instrument accepts no new orders but keeps its book intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    pub symbol: String,
    pub kind: InstrumentKind,
    pub reference_id: InstrumentId,
    pub strike: Price,
    pub tick_size: Price,
    pub lot_size: Quantity,
    pub tick_value: Decimal,
    pub is_halted: bool,
}

impl Instrument {
    /// Create a scalar instrument
    pub fn scalar(
        id: InstrumentId,
        symbol: impl Into<String>,
        tick_size: Price,
        lot_size: Quantity,
        tick_value: Decimal,
    ) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            kind: InstrumentKind::Scalar,
            reference_id: InstrumentId::none(),
            strike: Price::zero(),
            tick_size,
            lot_size,
            tick_value,
            is_halted: false,
        }
    }

    /// Create a call or put on an underlying scalar
    #[allow(clippy::too_many_arguments)]
    pub fn option(
        id: InstrumentId,
        symbol: impl Into<String>,
        kind: InstrumentKind,
        reference_id: InstrumentId,
        strike: Price,
        tick_size: Price,
        lot_size: Quantity,
        tick_value: Decimal,
    ) -> Self {
        assert!(kind.is_option(), "option() requires a CALL or PUT kind");
        Self {
            id,
            symbol: symbol.into(),
            kind,
            reference_id,
            strike,
            tick_size,
            lot_size,
            tick_value,
            is_halted: false,
        }
    }

    /// Settlement payoff per unit held, in dollars
    ///
    /// SCALAR: `settlement · tick_value`
    /// CALL:   `max(settlement − strike, 0) · tick_value`
    /// PUT:    `max(strike − settlement, 0) · tick_value`
    pub fn settlement_payoff(&self, settlement_value: Price) -> Decimal {
        let intrinsic = match self.kind {
            InstrumentKind::Scalar => settlement_value.to_dollars(),
            InstrumentKind::Call => {
                (settlement_value - self.strike).to_dollars().max(Decimal::ZERO)
            }
            InstrumentKind::Put => {
                (self.strike - settlement_value).to_dollars().max(Decimal::ZERO)
            }
        };
        intrinsic * self.tick_value
    }
}
