//! Quote generation.
//!
//! Centers a bid/ask pair on the reservation price, half the total
//! spread each side, then applies the optional passive book clamp and
//! inventory size skew. Pure function of its inputs: identical inputs
//! produce identical quote sets.

use admm_core::{MarketSnapshot, Price, Size};
use rust_decimal::Decimal;

use crate::config::StrategyParameters;
use crate::error::{Result, StrategyError};

/// One side of a quote pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price: Price,
    pub size: Size,
}

/// A bid/ask pair ready for the execution collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSet {
    pub bid: Quote,
    pub ask: Quote,
    /// Tick timestamp the pair was generated at.
    pub generated_at: u64,
}

/// Build the bid/ask pair for one tick.
///
/// `skew` is the signed inventory deviation from the target ratio
/// (`InventoryTracker::skew`). The invariant bid < ask is checked after
/// all adjustments; a violation means the spread floor upstream failed
/// and the pair must never reach the execution collaborator.
pub fn generate_quotes(
    snapshot: &MarketSnapshot,
    reservation: Price,
    total_spread: Decimal,
    skew: Decimal,
    params: &StrategyParameters,
    now_ms: u64,
) -> Result<QuoteSet> {
    let half = total_spread / Decimal::TWO;
    let mut bid_price = reservation.inner() - half;
    let mut ask_price = reservation.inner() + half;

    // Passive clamp: never bid through the book's best bid or offer
    // below its best ask, so quotes rest instead of taking.
    if params.clamp_to_book {
        bid_price = bid_price.min(snapshot.best_bid.inner());
        ask_price = ask_price.max(snapshot.best_ask.inner());
    }

    if bid_price >= ask_price {
        return Err(StrategyError::InvariantViolation {
            bid: bid_price,
            ask: ask_price,
        });
    }

    let (bid_size, ask_size) = skewed_sizes(skew, params);

    Ok(QuoteSet {
        bid: Quote {
            price: Price::new(bid_price),
            size: bid_size,
        },
        ask: Quote {
            price: Price::new(ask_price),
            size: ask_size,
        },
        generated_at: now_ms,
    })
}

/// Scale down the size on the side that would worsen an inventory skew
/// past `size_skew_limit`. Within the limit both sides quote
/// `order_amount`; past it the worsening side shrinks linearly with the
/// excess, floored at zero. A zero limit disables the adjustment.
fn skewed_sizes(skew: Decimal, params: &StrategyParameters) -> (Size, Size) {
    let full = Size::new(params.order_amount);
    let limit = params.size_skew_limit;
    if limit.is_zero() || skew.abs() <= limit {
        return (full, full);
    }

    let excess = skew.abs() - limit;
    let factor = (Decimal::ONE - excess).max(Decimal::ZERO);
    let reduced = Size::new(params.order_amount * factor);
    if skew > Decimal::ZERO {
        // Overexposed to base: buying worsens it, shrink the bid.
        (reduced, full)
    } else {
        (full, reduced)
    }
}
