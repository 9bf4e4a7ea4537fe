//! Strategy error taxonomy.
//!
//! Numeric degeneracies are converted to typed failures inside the
//! calculator that produced them; non-finite values never cross a
//! module boundary.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the pricing core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// Volatility or inventory data insufficient; the tick is skipped.
    #[error("calculation not ready: {0}")]
    CalculationNotReady(&'static str),

    /// Degenerate configuration value; the strategy must not start.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: Decimal },

    /// Non-positive price in a market observation; the tick is discarded.
    #[error("invalid observation: {0}")]
    InvalidObservation(String),

    /// Negative holdings reported. Indicates a bookkeeping bug in the
    /// collaborator; quoting halts rather than silently correcting.
    #[error("inventory inconsistency: base={base}, quote={quote}")]
    InventoryInconsistency { base: Decimal, quote: Decimal },

    /// bid >= ask escaped the quote generator. Quoting suspends and
    /// requires operator intervention.
    #[error("invariant violation: bid {bid} >= ask {ask}")]
    InvariantViolation { bid: Decimal, ask: Decimal },
}

/// Result type alias for strategy operations.
pub type Result<T> = std::result::Result<T, StrategyError>;
