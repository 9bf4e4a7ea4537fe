//! Decision types handed to the external execution collaborator.
//!
//! The strategy never talks to an exchange itself. Each tick it emits a
//! list of `ExecutionDecision`s; the host submits them asynchronously
//! and reports acks, fills, and failures back into the strategy.

use serde::{Deserialize, Serialize};

use crate::order::{ClientOrderId, OrderSide};
use crate::{Price, Size};

/// New order waiting to be submitted by the execution collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    /// Client order ID for idempotency.
    pub cloid: ClientOrderId,
    /// Order side (buy/sell).
    pub side: OrderSide,
    /// Limit price.
    pub price: Price,
    /// Order size in base units.
    pub size: Size,
    /// Creation timestamp (Unix milliseconds).
    pub created_at: u64,
}

impl PendingOrder {
    #[must_use]
    pub fn new(
        cloid: ClientOrderId,
        side: OrderSide,
        price: Price,
        size: Size,
        created_at: u64,
    ) -> Self {
        Self {
            cloid,
            side,
            price,
            size,
            created_at,
        }
    }
}

/// Cancel request for a resting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCancel {
    /// Exchange order ID to cancel.
    pub oid: u64,
    /// Creation timestamp (Unix milliseconds).
    pub created_at: u64,
}

impl PendingCancel {
    #[must_use]
    pub fn new(oid: u64, created_at: u64) -> Self {
        Self { oid, created_at }
    }
}

/// One decision for the execution collaborator.
///
/// Within a tick the decision list is ordered: cancels always precede
/// placements so stale and fresh quotes never rest side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionDecision {
    /// Submit a new order.
    Place(PendingOrder),
    /// Cancel a resting order.
    Cancel(PendingCancel),
    /// Cancel every resting order for the instrument (shutdown path).
    CancelAll,
}

impl ExecutionDecision {
    /// Whether this decision removes liquidity from the book.
    #[must_use]
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel(_) | Self::CancelAll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pending_order_creation() {
        let cloid = ClientOrderId::new();
        let order = PendingOrder::new(
            cloid.clone(),
            OrderSide::Buy,
            Price::new(dec!(50000)),
            Size::new(dec!(0.1)),
            1234567890,
        );

        assert_eq!(order.cloid, cloid);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.size, Size::new(dec!(0.1)));
    }

    #[test]
    fn test_decision_kind() {
        let cancel = ExecutionDecision::Cancel(PendingCancel::new(7, 0));
        assert!(cancel.is_cancel());
        assert!(ExecutionDecision::CancelAll.is_cancel());

        let place = ExecutionDecision::Place(PendingOrder::new(
            ClientOrderId::new(),
            OrderSide::Sell,
            Price::new(dec!(100)),
            Size::new(dec!(1)),
            0,
        ));
        assert!(!place.is_cancel());
    }
}
