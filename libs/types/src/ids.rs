//! Identifier types for engine entities
//!
//! All identifiers are opaque positive integers. `OrderId` values are
//! allocated by the engine, monotonically increasing and never reused
//! within a session; user and instrument ids are assigned by the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a user within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentId(u32);

impl InstrumentId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Sentinel for "no reference instrument" (scalars have no underlying)
    pub fn none() -> Self {
        Self(0)
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for InstrumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an order
///
/// Allocated by the engine's sequencer, monotonic but not necessarily
/// contiguous. Globally unique across all instruments within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(u64);

impl OrderId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_ordering() {
        let a = OrderId::new(1);
        let b = OrderId::new(2);
        assert!(a < b, "OrderIds must order by allocation");
        assert_ne!(a, b);
    }

    #[test]
    fn test_instrument_id_none_sentinel() {
        assert!(InstrumentId::none().is_none());
        assert!(!InstrumentId::new(7).is_none());
    }

    #[test]
    fn test_id_serialization_transparent() {
        let id = OrderId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");

        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_user_id_display() {
        assert_eq!(UserId::new(9).to_string(), "9");
    }
}
