//! Reservation price calculation.
//!
//! The reservation price is the inventory-adjusted fair price quotes
//! are centered around:
//!
//! r = mid − q · γ · σ² · (T − t)
//!
//! Holding more base asset than target (q > 0) pulls the reservation
//! price below mid, biasing quotes toward selling; holding less pulls
//! it above mid, biasing toward buying.

use admm_core::Price;
use rust_decimal::Decimal;

use crate::config::StrategyParameters;

/// Compute the reservation price.
///
/// `q_units` is the inventory deviation from target in base-asset
/// units (`InventoryTracker::inventory_units`), not the ratio. `sigma`
/// is the current NATR as a decimal fraction; callers must have checked
/// volatility availability before calling. `params.time_horizon` is
/// strictly positive by configuration validation.
pub fn reservation_price(
    mid_price: Price,
    q_units: Decimal,
    sigma: Decimal,
    params: &StrategyParameters,
) -> Price {
    let adjustment = q_units * params.risk_aversion * sigma * sigma * params.time_horizon;
    Price::new(mid_price.inner() - adjustment)
}
