//! Structured observability events.
//!
//! Emitted through `TickOutcome` so the host can forward them to its
//! own telemetry; each is also logged via `tracing` at the source.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why quoting was suspended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspendReason {
    /// Placement/cancellation retries exhausted.
    RetriesExhausted,
    /// bid >= ask escaped the quote generator.
    InvariantViolation,
    /// Negative holdings reported by the collaborator.
    InventoryInconsistency,
}

impl std::fmt::Display for SuspendReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RetriesExhausted => write!(f, "retries_exhausted"),
            Self::InvariantViolation => write!(f, "invariant_violation"),
            Self::InventoryInconsistency => write!(f, "inventory_inconsistency"),
        }
    }
}

/// Operator-visible strategy events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StrategyEvent {
    /// The raw spread formula produced a non-finite or sub-floor value
    /// and was clamped to the configured minimum.
    SpreadClamped {
        /// Raw formula output, when it was finite.
        raw: Option<Decimal>,
        /// The floor the spread was clamped to.
        floored_to: Decimal,
    },
    /// Quoting stopped and will not resume without operator action.
    QuotingSuspended { reason: SuspendReason },
    /// Negative holdings were reported; includes the offending values.
    InventoryInconsistency { base: Decimal, quote: Decimal },
}
