//! Avellaneda-Stoikov market-making core.
//!
//! A pure pricing library: the host process feeds market snapshots,
//! fills, and execution acks into a [`StrategyContext`] and submits the
//! [`ExecutionDecision`](admm_core::ExecutionDecision)s it returns.
//! Quotes are centered on an inventory-skewed reservation price with a
//! volatility- and arrival-rate-driven spread; a refresh state machine
//! decides when resting quotes are replaced.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod inventory;
pub mod quote_engine;
pub mod reservation;
pub mod scheduler;
pub mod spread;
pub mod volatility;

pub use config::StrategyParameters;
pub use engine::{SkipReason, StatusSnapshot, StrategyContext, TickOutcome};
pub use error::{Result, StrategyError};
pub use events::{StrategyEvent, SuspendReason};
pub use inventory::InventoryTracker;
pub use quote_engine::{generate_quotes, Quote, QuoteSet};
pub use reservation::reservation_price;
pub use scheduler::{RefreshScheduler, SchedulerState};
pub use spread::{half_spread, total_spread, SpreadQuote};
pub use volatility::NatrEstimator;
