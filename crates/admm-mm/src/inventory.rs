//! Inventory tracking.
//!
//! Holds the base/quote balances for the quoted instrument and derives
//! the skew measures the pricing formulas consume. Balances are only
//! mutated through `apply_fill`; the pricing components read them.

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{Result, StrategyError};

/// Base/quote holdings with a target allocation.
#[derive(Debug, Clone)]
pub struct InventoryTracker {
    /// Base-asset holdings, non-negative.
    base_amount: Decimal,
    /// Quote-asset holdings, non-negative.
    quote_amount: Decimal,
    /// Target fraction of total position value held in base, in [0, 1].
    target_base_ratio: Decimal,
}

impl InventoryTracker {
    /// Create a tracker from starting balances.
    pub fn new(base_amount: Decimal, quote_amount: Decimal, target_base_ratio: Decimal) -> Self {
        Self {
            base_amount,
            quote_amount,
            target_base_ratio,
        }
    }

    /// Apply a fill reported by the execution collaborator.
    ///
    /// A buy fill is `(+base, -quote)`, a sell fill `(-base, +quote)`.
    /// Holdings are never clamped: a resulting negative balance means
    /// the collaborator's bookkeeping is wrong and is surfaced as
    /// `InventoryInconsistency` without mutating state.
    pub fn apply_fill(&mut self, delta_base: Decimal, delta_quote: Decimal) -> Result<()> {
        let new_base = self.base_amount + delta_base;
        let new_quote = self.quote_amount + delta_quote;
        if new_base < Decimal::ZERO || new_quote < Decimal::ZERO {
            return Err(StrategyError::InventoryInconsistency {
                base: new_base,
                quote: new_quote,
            });
        }
        self.base_amount = new_base;
        self.quote_amount = new_quote;
        debug!(base = %new_base, quote = %new_quote, "fill applied");
        Ok(())
    }

    /// Fraction of total position value currently held in the base
    /// asset: `base / (base + quote / mid)`.
    ///
    /// An empty position reports the target ratio, so it produces no
    /// skew rather than a phantom short.
    pub fn inventory_ratio(&self, mid_price: Decimal) -> Decimal {
        let total = self.total_base_units(mid_price);
        if total <= Decimal::ZERO {
            return self.target_base_ratio;
        }
        self.base_amount / total
    }

    /// Signed deviation from the target ratio. Positive means
    /// overexposed to the base asset.
    pub fn skew(&self, mid_price: Decimal) -> Decimal {
        self.inventory_ratio(mid_price) - self.target_base_ratio
    }

    /// Inventory deviation expressed in base-asset units: skew times
    /// total position size. This is the `q` of the reservation price.
    pub fn inventory_units(&self, mid_price: Decimal) -> Decimal {
        self.skew(mid_price) * self.total_base_units(mid_price)
    }

    /// Total position size in base-asset units.
    pub fn total_base_units(&self, mid_price: Decimal) -> Decimal {
        if mid_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.base_amount + self.quote_amount / mid_price
    }

    pub fn base_amount(&self) -> Decimal {
        self.base_amount
    }

    pub fn quote_amount(&self) -> Decimal {
        self.quote_amount
    }

    pub fn target_base_ratio(&self) -> Decimal {
        self.target_base_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balanced_inventory_no_skew() {
        // 1 base + 100 quote at mid 100: ratio = 1 / (1 + 1) = 0.5.
        let inv = InventoryTracker::new(dec!(1), dec!(100), dec!(0.5));
        assert_eq!(inv.inventory_ratio(dec!(100)), dec!(0.5));
        assert_eq!(inv.skew(dec!(100)), dec!(0));
        assert_eq!(inv.inventory_units(dec!(100)), dec!(0));
    }

    #[test]
    fn test_long_inventory_positive_skew() {
        // 3 base + 100 quote at mid 100: ratio = 3/4.
        let inv = InventoryTracker::new(dec!(3), dec!(100), dec!(0.5));
        assert_eq!(inv.inventory_ratio(dec!(100)), dec!(0.75));
        assert_eq!(inv.skew(dec!(100)), dec!(0.25));
        // q = 0.25 * 4 = 1 base unit above target.
        assert_eq!(inv.inventory_units(dec!(100)), dec!(1));
    }

    #[test]
    fn test_short_inventory_negative_skew() {
        let inv = InventoryTracker::new(dec!(0), dec!(200), dec!(0.5));
        assert_eq!(inv.inventory_ratio(dec!(100)), dec!(0));
        assert_eq!(inv.skew(dec!(100)), dec!(-0.5));
        assert_eq!(inv.inventory_units(dec!(100)), dec!(-1));
    }

    #[test]
    fn test_empty_position_reports_target() {
        let inv = InventoryTracker::new(dec!(0), dec!(0), dec!(0.5));
        assert_eq!(inv.inventory_ratio(dec!(100)), dec!(0.5));
        assert_eq!(inv.skew(dec!(100)), dec!(0));
    }

    #[test]
    fn test_apply_fill_buy() {
        let mut inv = InventoryTracker::new(dec!(1), dec!(100), dec!(0.5));
        inv.apply_fill(dec!(0.5), dec!(-50)).unwrap();
        assert_eq!(inv.base_amount(), dec!(1.5));
        assert_eq!(inv.quote_amount(), dec!(50));
    }

    #[test]
    fn test_negative_holdings_rejected_unchanged() {
        let mut inv = InventoryTracker::new(dec!(1), dec!(100), dec!(0.5));
        let err = inv.apply_fill(dec!(-2), dec!(200));
        assert!(matches!(
            err,
            Err(StrategyError::InventoryInconsistency { .. })
        ));
        // State untouched after the rejection.
        assert_eq!(inv.base_amount(), dec!(1));
        assert_eq!(inv.quote_amount(), dec!(100));
    }
}
