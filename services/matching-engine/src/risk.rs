//! Pre-trade risk gate
//!
//! Enforces the per-user, per-instrument position cap: a submission is
//! refused when the worst-case resulting position would exceed the cap in
//! absolute value. Notional and rate limits are stored alongside but not
//! yet enforced. Users with no configured limits pass every check.

use std::collections::HashMap;
use types::ids::UserId;
use types::numeric::Quantity;
use types::order::Side;
use types::risk::{RiskCheckResult, RiskLimits};

/// Per-user risk limit store and position-cap check
#[derive(Debug, Default)]
pub struct RiskGate {
    limits: HashMap<UserId, RiskLimits>,
}

impl RiskGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or replace a user's limits
    pub fn set_limits(&mut self, user_id: UserId, limits: RiskLimits) {
        self.limits.insert(user_id, limits);
    }

    pub fn limits(&self, user_id: UserId) -> Option<&RiskLimits> {
        self.limits.get(&user_id)
    }

    /// Check a submission against the position cap.
    ///
    /// `current_net` is the user's present net quantity in the target
    /// instrument; the check assumes the order fills completely.
    pub fn check(
        &self,
        user_id: UserId,
        current_net: i64,
        side: Side,
        quantity: Quantity,
    ) -> RiskCheckResult {
        let Some(limits) = self.limits.get(&user_id) else {
            return RiskCheckResult::Pass;
        };

        let resulting = current_net + side.sign() * quantity.as_i64();
        if resulting.abs() > limits.max_position {
            return RiskCheckResult::PositionLimitExceeded {
                limit: limits.max_position,
                resulting,
            };
        }

        RiskCheckResult::Pass
    }
}
