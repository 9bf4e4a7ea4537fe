//! Market data types.
//!
//! One `MarketSnapshot` is produced per pricing tick by the external
//! market-data collaborator and consumed read-only by the strategy.

use crate::Price;
use serde::{Deserialize, Serialize};

/// Validity of a market snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotState {
    /// All prices positive and the book is not crossed.
    Valid,
    /// A non-positive price was observed (mid, candle, or book).
    NonPositivePrice,
    /// Best bid at or above best ask.
    CrossedBook,
    /// Candle high below candle low.
    InvertedRange,
}

impl SnapshotState {
    /// Whether the snapshot may be used for quoting.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for SnapshotState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::NonPositivePrice => write!(f, "NON_POSITIVE_PRICE"),
            Self::CrossedBook => write!(f, "CROSSED_BOOK"),
            Self::InvertedRange => write!(f, "INVERTED_RANGE"),
        }
    }
}

/// Immutable per-tick market observation.
///
/// `high`, `low`, `close` describe the most recent completed candle and
/// feed the volatility estimate; `mid_price` and the best bid/ask are
/// the live book reference the quotes are built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Mid price of the live book.
    pub mid_price: Price,
    /// Best resting bid.
    pub best_bid: Price,
    /// Best resting ask.
    pub best_ask: Price,
    /// Candle high.
    pub high: Price,
    /// Candle low.
    pub low: Price,
    /// Candle close.
    pub close: Price,
    /// Observation timestamp (Unix milliseconds).
    pub timestamp_ms: u64,
}

impl MarketSnapshot {
    /// Create a new snapshot.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mid_price: Price,
        best_bid: Price,
        best_ask: Price,
        high: Price,
        low: Price,
        close: Price,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            mid_price,
            best_bid,
            best_ask,
            high,
            low,
            close,
            timestamp_ms,
        }
    }

    /// Classify the snapshot.
    pub fn state(&self) -> SnapshotState {
        let prices = [
            self.mid_price,
            self.best_bid,
            self.best_ask,
            self.high,
            self.low,
            self.close,
        ];
        if prices.iter().any(|p| !p.is_positive()) {
            return SnapshotState::NonPositivePrice;
        }
        if self.best_bid >= self.best_ask {
            return SnapshotState::CrossedBook;
        }
        if self.high < self.low {
            return SnapshotState::InvertedRange;
        }
        SnapshotState::Valid
    }

    /// Whether the snapshot may be used for quoting.
    pub fn is_usable(&self) -> bool {
        self.state().is_usable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snap(mid: Price, bid: Price, ask: Price) -> MarketSnapshot {
        MarketSnapshot::new(
            mid,
            bid,
            ask,
            Price::new(dec!(101)),
            Price::new(dec!(99)),
            Price::new(dec!(100)),
            1_000,
        )
    }

    #[test]
    fn test_valid_snapshot() {
        let s = snap(
            Price::new(dec!(100)),
            Price::new(dec!(99.9)),
            Price::new(dec!(100.1)),
        );
        assert_eq!(s.state(), SnapshotState::Valid);
        assert!(s.is_usable());
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let s = snap(
            Price::ZERO,
            Price::new(dec!(99.9)),
            Price::new(dec!(100.1)),
        );
        assert_eq!(s.state(), SnapshotState::NonPositivePrice);
        assert!(!s.is_usable());
    }

    #[test]
    fn test_crossed_book_rejected() {
        let s = snap(
            Price::new(dec!(100)),
            Price::new(dec!(100.2)),
            Price::new(dec!(100.1)),
        );
        assert_eq!(s.state(), SnapshotState::CrossedBook);
    }

    #[test]
    fn test_inverted_candle_rejected() {
        let mut s = snap(
            Price::new(dec!(100)),
            Price::new(dec!(99.9)),
            Price::new(dec!(100.1)),
        );
        s.high = Price::new(dec!(98));
        assert_eq!(s.state(), SnapshotState::InvertedRange);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SnapshotState::Valid.to_string(), "VALID");
        assert_eq!(
            SnapshotState::NonPositivePrice.to_string(),
            "NON_POSITIVE_PRICE"
        );
    }
}
