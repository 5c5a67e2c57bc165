//! Risk limit types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-user risk limits
///
/// Only the position cap is enforced today; notional and rate limits are
/// carried so the gateway can configure them ahead of enforcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Maximum absolute net position per instrument
    pub max_position: i64,
    /// Maximum total notional exposure (stored, not yet enforced)
    pub max_notional: Decimal,
    /// Order rate limit (stored, not yet enforced)
    pub max_orders_per_sec: u32,
}

impl Default for RiskLimits {
    fn default() -> Self {
        Self {
            max_position: 10_000,
            max_notional: Decimal::from(1_000_000),
            max_orders_per_sec: 50,
        }
    }
}

impl RiskLimits {
    pub fn with_max_position(max_position: i64) -> Self {
        Self {
            max_position,
            ..Self::default()
        }
    }
}

/// Outcome of a pre-trade risk check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskCheckResult {
    /// Passed all configured checks
    Pass,
    /// The order would push the position past the cap
    PositionLimitExceeded {
        limit: i64,
        resulting: i64,
    },
}

impl RiskCheckResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, RiskCheckResult::Pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = RiskLimits::default();
        assert_eq!(limits.max_position, 10_000);
        assert_eq!(limits.max_orders_per_sec, 50);
    }

    #[test]
    fn test_with_max_position() {
        let limits = RiskLimits::with_max_position(500);
        assert_eq!(limits.max_position, 500);
        assert_eq!(limits.max_notional, RiskLimits::default().max_notional);
    }

    #[test]
    fn test_check_result_pass() {
        assert!(RiskCheckResult::Pass.is_pass());
        let fail = RiskCheckResult::PositionLimitExceeded {
            limit: 100,
            resulting: 150,
        };
        assert!(!fail.is_pass());
    }
}
