//! Tick pipeline.
//!
//! `StrategyContext` owns every stateful component and exposes one
//! synchronous entry point per tick. The host drives the loop, submits
//! the returned decisions, and feeds acks and fills back in; the
//! context itself never blocks and holds no global state.

use admm_core::{ClientOrderId, ExecutionDecision, MarketSnapshot, Price, SnapshotState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::StrategyParameters;
use crate::error::{Result, StrategyError};
use crate::events::{StrategyEvent, SuspendReason};
use crate::inventory::InventoryTracker;
use crate::quote_engine::{generate_quotes, QuoteSet};
use crate::reservation::reservation_price;
use crate::scheduler::{RefreshScheduler, SchedulerState};
use crate::spread::total_spread;
use crate::volatility::NatrEstimator;

/// Why a tick produced no quotes.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Quoting is suspended and needs operator intervention.
    Suspended(SuspendReason),
    /// The market snapshot failed validation.
    UnusableSnapshot(SnapshotState),
    /// The volatility window is still warming up.
    VolatilityWarmup { samples: usize, required: usize },
    /// A calculator rejected its inputs mid-tick.
    Calculation(StrategyError),
}

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// The quote pair generated this tick, if any.
    pub quote: Option<QuoteSet>,
    /// Why no quote was generated, if none was.
    pub skip: Option<SkipReason>,
    /// Orders for the execution collaborator, cancels first.
    pub decisions: Vec<ExecutionDecision>,
    /// Operator-visible events raised this tick.
    pub events: Vec<StrategyEvent>,
}

impl TickOutcome {
    fn skipped(skip: SkipReason, events: Vec<StrategyEvent>) -> Self {
        Self {
            quote: None,
            skip: Some(skip),
            decisions: Vec::new(),
            events,
        }
    }
}

/// Read-only view for the operator/status layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub trading_pair: String,
    /// `None` while volatility is warming up.
    pub reservation_price: Option<Price>,
    /// Effective (floored) total spread, `None` while warming up.
    pub effective_spread: Option<Decimal>,
    pub natr: Option<Decimal>,
    pub inventory_ratio: Decimal,
    pub scheduler_state: SchedulerState,
    pub last_refresh_ms: Option<u64>,
    pub suspended: Option<SuspendReason>,
}

/// Owns the pricing state for one instrument.
///
/// Within a tick, volatility and inventory are read once before any
/// pricing runs; fills reported mid-tick land via `apply_fill` between
/// ticks, never during one.
#[derive(Debug)]
pub struct StrategyContext {
    params: StrategyParameters,
    estimator: NatrEstimator,
    inventory: InventoryTracker,
    scheduler: RefreshScheduler,
    last_quote: Option<QuoteSet>,
    not_ready_streak: u32,
    suspended: Option<SuspendReason>,
    /// Events raised between ticks, drained into the next outcome.
    pending_events: Vec<StrategyEvent>,
}

impl StrategyContext {
    /// Build a context from validated parameters and starting balances.
    ///
    /// Fails with `InvalidParameter` on a degenerate configuration; the
    /// strategy must not start with one.
    pub fn new(
        params: StrategyParameters,
        base_amount: Decimal,
        quote_amount: Decimal,
    ) -> Result<Self> {
        params.validate()?;
        info!(
            pair = %params.trading_pair,
            gamma = %params.risk_aversion,
            k = %params.arrival_rate_k,
            "strategy context created"
        );
        Ok(Self {
            estimator: NatrEstimator::new(params.natr_window, params.natr_min_samples),
            inventory: InventoryTracker::new(base_amount, quote_amount, params.target_base_ratio),
            scheduler: RefreshScheduler::new(&params),
            params,
            last_quote: None,
            not_ready_streak: 0,
            suspended: None,
            pending_events: Vec::new(),
        })
    }

    /// Process one market tick.
    pub fn on_tick(&mut self, snapshot: &MarketSnapshot, now_ms: u64) -> TickOutcome {
        let mut events = std::mem::take(&mut self.pending_events);

        if let Some(reason) = self.suspended {
            return TickOutcome::skipped(SkipReason::Suspended(reason), events);
        }

        let state = snapshot.state();
        if !state.is_usable() {
            warn!(state = %state, ts = snapshot.timestamp_ms, "discarding unusable snapshot");
            return TickOutcome::skipped(SkipReason::UnusableSnapshot(state), events);
        }

        if let Err(e) = self.estimator.observe(
            snapshot.high.inner(),
            snapshot.low.inner(),
            snapshot.close.inner(),
        ) {
            warn!(error = %e, "candle rejected");
            return TickOutcome::skipped(SkipReason::Calculation(e), events);
        }

        // Volatility and inventory are snapshotted here, once, so every
        // calculator below observes the same state.
        let sigma = match self.estimator.current() {
            Some(sigma) => {
                self.not_ready_streak = 0;
                sigma
            }
            None => {
                self.not_ready_streak += 1;
                if self.not_ready_streak == self.params.not_ready_report_ticks {
                    warn!(
                        ticks = self.not_ready_streak,
                        samples = self.estimator.sample_count(),
                        "volatility still warming up"
                    );
                }
                return TickOutcome::skipped(
                    SkipReason::VolatilityWarmup {
                        samples: self.estimator.sample_count(),
                        required: self.params.natr_min_samples,
                    },
                    events,
                );
            }
        };
        let mid = snapshot.mid_price;
        let q_units = self.inventory.inventory_units(mid.inner());
        let skew = self.inventory.skew(mid.inner());

        let reservation = reservation_price(mid, q_units, sigma, &self.params);

        let spread_quote = match total_spread(sigma, &self.params) {
            Ok(sq) => sq,
            Err(e) => {
                error!(error = %e, "spread calculation failed");
                return TickOutcome::skipped(SkipReason::Calculation(e), events);
            }
        };
        if spread_quote.clamped {
            events.push(StrategyEvent::SpreadClamped {
                raw: spread_quote.raw,
                floored_to: self.params.min_spread,
            });
        }

        let quotes = match generate_quotes(
            snapshot,
            reservation,
            spread_quote.spread,
            skew,
            &self.params,
            now_ms,
        ) {
            Ok(q) => q,
            Err(e) => {
                // bid >= ask must never reach the collaborator; flatten
                // and wait for the operator.
                error!(error = %e, "quote invariant violated, suspending");
                self.suspended = Some(SuspendReason::InvariantViolation);
                events.push(StrategyEvent::QuotingSuspended {
                    reason: SuspendReason::InvariantViolation,
                });
                let decisions = vec![self.scheduler.stop()];
                return TickOutcome {
                    quote: None,
                    skip: Some(SkipReason::Calculation(e)),
                    decisions,
                    events,
                };
            }
        };

        let decisions = self.scheduler.decide(&quotes, now_ms);
        debug!(
            bid = %quotes.bid.price,
            ask = %quotes.ask.price,
            sigma = %sigma,
            q = %q_units,
            decisions = decisions.len(),
            "tick quoted"
        );
        self.last_quote = Some(quotes);

        TickOutcome {
            quote: Some(quotes),
            skip: None,
            decisions,
            events,
        }
    }

    /// Apply a fill between ticks.
    ///
    /// A reported fill that would drive holdings negative suspends
    /// quoting immediately; bookkeeping bugs are never papered over.
    pub fn apply_fill(&mut self, delta_base: Decimal, delta_quote: Decimal) -> Result<()> {
        match self.inventory.apply_fill(delta_base, delta_quote) {
            Ok(()) => Ok(()),
            Err(e) => {
                if let StrategyError::InventoryInconsistency { base, quote } = e {
                    error!(base = %base, quote = %quote, "inventory inconsistency, suspending");
                    self.suspended = Some(SuspendReason::InventoryInconsistency);
                    self.pending_events
                        .push(StrategyEvent::InventoryInconsistency { base, quote });
                    self.pending_events.push(StrategyEvent::QuotingSuspended {
                        reason: SuspendReason::InventoryInconsistency,
                    });
                }
                Err(e)
            }
        }
    }

    /// Forward a placement ack from the execution collaborator.
    pub fn record_resting(&mut self, cloid: &ClientOrderId, oid: u64) {
        self.scheduler.record_resting(cloid, oid);
    }

    /// Forward a cancellation ack.
    pub fn record_cancel_acked(&mut self, oid: u64) {
        self.scheduler.record_cancel_acked(oid);
    }

    /// Report an execution failure; may suspend quoting once retries
    /// are exhausted.
    pub fn record_failure(&mut self, now_ms: u64) {
        if let Some(reason) = self.scheduler.record_failure(now_ms) {
            self.suspended = Some(reason);
            self.pending_events
                .push(StrategyEvent::QuotingSuspended { reason });
        }
    }

    /// Shut down quoting; returns the decisions that flatten the book.
    pub fn stop(&mut self) -> Vec<ExecutionDecision> {
        vec![self.scheduler.stop()]
    }

    /// Operator action: clear a suspension and allow quoting again.
    pub fn resume(&mut self) {
        if let Some(reason) = self.suspended.take() {
            info!(reason = %reason, "suspension cleared by operator");
        }
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    /// Read-only status for the operator layer.
    pub fn status(&self, mid: Price) -> StatusSnapshot {
        let natr = self.estimator.current();
        let reservation = natr.map(|sigma| {
            reservation_price(
                mid,
                self.inventory.inventory_units(mid.inner()),
                sigma,
                &self.params,
            )
        });
        let effective_spread =
            natr.and_then(|sigma| total_spread(sigma, &self.params).ok().map(|sq| sq.spread));
        StatusSnapshot {
            trading_pair: self.params.trading_pair.clone(),
            reservation_price: reservation,
            effective_spread,
            natr,
            inventory_ratio: self.inventory.inventory_ratio(mid.inner()),
            scheduler_state: self.scheduler.state(),
            last_refresh_ms: self.scheduler.last_placed_at(),
            suspended: self.suspended,
        }
    }

    pub fn params(&self) -> &StrategyParameters {
        &self.params
    }

    pub fn inventory(&self) -> &InventoryTracker {
        &self.inventory
    }

    pub fn last_quote(&self) -> Option<&QuoteSet> {
        self.last_quote.as_ref()
    }
}
