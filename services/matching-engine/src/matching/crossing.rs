//! Crossing detection
//!
//! A buy crosses when its limit is at or above the resting ask; a sell
//! crosses when its limit is at or below the resting bid. Equality
//! crosses; one tick away does not.

use types::numeric::Price;
use types::order::Side;

/// Can an incoming limit order trade against a resting price?
pub fn incoming_can_match(incoming_side: Side, incoming_price: Price, resting_price: Price) -> bool {
    match incoming_side {
        Side::Buy => incoming_price >= resting_price,
        Side::Sell => incoming_price <= resting_price,
    }
}
