//! Quote refresh scheduling.
//!
//! State machine deciding when resting quotes are cancelled and
//! replaced. Cancels are always emitted strictly before the placements
//! that replace them; the collaborator acknowledges both, and the
//! machine only settles back into `Quoting` once every outstanding ack
//! has arrived.

use admm_core::{ClientOrderId, ExecutionDecision, OrderSide, PendingCancel, PendingOrder, Price, Size};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::StrategyParameters;
use crate::events::SuspendReason;
use crate::quote_engine::QuoteSet;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerState {
    /// No resting quotes.
    Idle,
    /// Both sides resting, watching for staleness.
    Quoting,
    /// Cancel/place cycle in flight, waiting on acks.
    Refreshing,
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Quoting => write!(f, "quoting"),
            Self::Refreshing => write!(f, "refreshing"),
        }
    }
}

/// A quote the collaborator is (or will be) resting for us.
#[derive(Debug, Clone)]
struct RestingOrder {
    cloid: ClientOrderId,
    /// Exchange order id, known once the placement is acknowledged.
    oid: Option<u64>,
    side: OrderSide,
    price: Price,
    size: Size,
}

/// Cancel/replace state machine for one instrument.
#[derive(Debug)]
pub struct RefreshScheduler {
    state: SchedulerState,
    /// At most one order per side.
    resting: Vec<RestingOrder>,
    /// Exchange ids of cancels awaiting acknowledgement.
    pending_cancels: Vec<u64>,
    /// Client ids of placements awaiting acknowledgement.
    pending_places: Vec<ClientOrderId>,
    last_placed_at: Option<u64>,
    retries: u32,
    next_retry_at: Option<u64>,
    order_refresh_time_ms: u64,
    refresh_tolerance_bps: Decimal,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl RefreshScheduler {
    pub fn new(params: &StrategyParameters) -> Self {
        Self {
            state: SchedulerState::Idle,
            resting: Vec::with_capacity(2),
            pending_cancels: Vec::new(),
            pending_places: Vec::new(),
            last_placed_at: None,
            retries: 0,
            next_retry_at: None,
            order_refresh_time_ms: params.order_refresh_time_ms,
            refresh_tolerance_bps: params.refresh_tolerance_bps,
            max_retries: params.max_retries,
            retry_backoff_ms: params.retry_backoff_ms,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn last_placed_at(&self) -> Option<u64> {
        self.last_placed_at
    }

    /// Decide what the execution collaborator should do with the fresh
    /// quote set. Cancels always precede placements in the returned
    /// decision list.
    pub fn decide(&mut self, quotes: &QuoteSet, now_ms: u64) -> Vec<ExecutionDecision> {
        match self.state {
            SchedulerState::Idle => {
                let decisions = self.place_both(quotes, now_ms);
                self.state = SchedulerState::Quoting;
                info!(bid = %quotes.bid.price, ask = %quotes.ask.price, "initial quotes placed");
                decisions
            }
            SchedulerState::Quoting => {
                // Earlier placements without an exchange id yet cannot
                // be cancelled; refreshing now would orphan them at the
                // collaborator. Hold the current quotes until the acks
                // arrive.
                if !self.pending_places.is_empty() {
                    return Vec::new();
                }
                if !self.should_refresh(quotes, now_ms) {
                    return Vec::new();
                }
                let mut decisions: Vec<ExecutionDecision> = self
                    .resting
                    .iter()
                    .filter_map(|o| o.oid)
                    .map(|oid| ExecutionDecision::Cancel(PendingCancel::new(oid, now_ms)))
                    .collect();
                self.pending_cancels = self.resting.iter().filter_map(|o| o.oid).collect();
                decisions.extend(self.place_both(quotes, now_ms));
                self.state = SchedulerState::Refreshing;
                debug!(bid = %quotes.bid.price, ask = %quotes.ask.price, "refreshing quotes");
                decisions
            }
            SchedulerState::Refreshing => {
                // Nothing new until acks, except a due placement retry.
                match self.next_retry_at {
                    Some(at) if now_ms >= at => {
                        self.next_retry_at = None;
                        self.reissue_pending(now_ms)
                    }
                    _ => Vec::new(),
                }
            }
        }
    }

    /// Attach the exchange id the collaborator assigned to a placement.
    pub fn record_resting(&mut self, cloid: &ClientOrderId, oid: u64) {
        if let Some(order) = self.resting.iter_mut().find(|o| &o.cloid == cloid) {
            order.oid = Some(oid);
        }
        self.pending_places.retain(|c| c != cloid);
        self.maybe_settle();
    }

    /// Acknowledge a cancellation.
    pub fn record_cancel_acked(&mut self, oid: u64) {
        self.pending_cancels.retain(|&o| o != oid);
        self.maybe_settle();
    }

    /// Report a placement or cancellation failure from the collaborator.
    ///
    /// Retries are bounded with a doubling backoff; exhausting them
    /// abandons the cycle and suspends quoting.
    pub fn record_failure(&mut self, now_ms: u64) -> Option<SuspendReason> {
        self.retries += 1;
        if self.retries > self.max_retries {
            warn!(retries = self.retries - 1, "placement retries exhausted, suspending");
            self.reset();
            return Some(SuspendReason::RetriesExhausted);
        }
        let backoff = self
            .retry_backoff_ms
            .checked_shl(self.retries - 1)
            .unwrap_or(u64::MAX);
        self.next_retry_at = Some(now_ms.saturating_add(backoff));
        warn!(attempt = self.retries, backoff_ms = backoff, "execution failure, will retry");
        None
    }

    /// Shut down: abandon all tracking and tell the collaborator to
    /// flatten the book.
    pub fn stop(&mut self) -> ExecutionDecision {
        info!("scheduler stopped, cancelling all");
        self.reset();
        ExecutionDecision::CancelAll
    }

    fn reset(&mut self) {
        self.state = SchedulerState::Idle;
        self.resting.clear();
        self.pending_cancels.clear();
        self.pending_places.clear();
        self.last_placed_at = None;
        self.retries = 0;
        self.next_retry_at = None;
    }

    fn maybe_settle(&mut self) {
        if self.state == SchedulerState::Refreshing
            && self.pending_cancels.is_empty()
            && self.pending_places.is_empty()
        {
            self.state = SchedulerState::Quoting;
            self.retries = 0;
            self.next_retry_at = None;
        }
    }

    fn should_refresh(&self, quotes: &QuoteSet, now_ms: u64) -> bool {
        if let Some(placed) = self.last_placed_at {
            if now_ms.saturating_sub(placed) >= self.order_refresh_time_ms {
                return true;
            }
        }
        self.resting.iter().any(|order| {
            let fresh = match order.side {
                OrderSide::Buy => quotes.bid.price,
                OrderSide::Sell => quotes.ask.price,
            };
            match fresh.bps_from(order.price) {
                Some(bps) => bps.abs() >= self.refresh_tolerance_bps,
                None => true,
            }
        })
    }

    /// Replace the tracked orders with the new pair and emit placements.
    fn place_both(&mut self, quotes: &QuoteSet, now_ms: u64) -> Vec<ExecutionDecision> {
        self.resting = vec![
            RestingOrder {
                cloid: ClientOrderId::new(),
                oid: None,
                side: OrderSide::Buy,
                price: quotes.bid.price,
                size: quotes.bid.size,
            },
            RestingOrder {
                cloid: ClientOrderId::new(),
                oid: None,
                side: OrderSide::Sell,
                price: quotes.ask.price,
                size: quotes.ask.size,
            },
        ];
        self.pending_places = self.resting.iter().map(|o| o.cloid.clone()).collect();
        self.last_placed_at = Some(now_ms);
        self.resting
            .iter()
            .map(|o| {
                ExecutionDecision::Place(PendingOrder::new(
                    o.cloid.clone(),
                    o.side,
                    o.price,
                    o.size,
                    now_ms,
                ))
            })
            .collect()
    }

    /// Re-emit cancels and placements that were never acknowledged,
    /// cancels first.
    fn reissue_pending(&mut self, now_ms: u64) -> Vec<ExecutionDecision> {
        let mut decisions: Vec<ExecutionDecision> = self
            .pending_cancels
            .iter()
            .map(|&oid| ExecutionDecision::Cancel(PendingCancel::new(oid, now_ms)))
            .collect();
        decisions.extend(
            self.resting
                .iter()
                .filter(|o| self.pending_places.contains(&o.cloid))
                .map(|o| {
                    ExecutionDecision::Place(PendingOrder::new(
                        o.cloid.clone(),
                        o.side,
                        o.price,
                        o.size,
                        now_ms,
                    ))
                }),
        );
        decisions
    }
}
