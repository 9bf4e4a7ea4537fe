//! Core domain types for the adaptive market maker.
//!
//! This crate provides the fundamental types shared by the pricing
//! core and any host process:
//! - `Price`, `Size`: precision-safe numeric types
//! - `MarketSnapshot`: per-tick market observation
//! - `OrderSide`, `ClientOrderId`: order identity
//! - `ExecutionDecision`: output consumed by the execution collaborator

pub mod decimal;
pub mod execution;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use execution::{ExecutionDecision, PendingCancel, PendingOrder};
pub use order::{ClientOrderId, OrderSide};
pub use types::{MarketSnapshot, SnapshotState};
