//! Rolling NATR volatility estimation.
//!
//! Maintains a fixed-length window of true-range samples over completed
//! candles and reports the normalized average true range as a decimal
//! fraction of the last close. The estimate is "unavailable" until the
//! window has warmed up; callers must treat that as "do not quote yet",
//! never as zero volatility.

use std::collections::VecDeque;

use rust_decimal::Decimal;

use crate::error::{Result, StrategyError};

/// Rolling NATR estimator.
#[derive(Debug)]
pub struct NatrEstimator {
    /// Rolling window of true-range samples.
    true_ranges: VecDeque<Decimal>,
    /// Close of the previous completed candle.
    prev_close: Option<Decimal>,
    /// Close of the most recent candle, the NATR denominator.
    last_close: Option<Decimal>,
    /// Window length in candles.
    window: usize,
    /// Samples required before `current()` reports a value.
    min_samples: usize,
}

impl NatrEstimator {
    /// Create an estimator with the given window and warm-up threshold.
    pub fn new(window: usize, min_samples: usize) -> Self {
        Self {
            true_ranges: VecDeque::with_capacity(window),
            prev_close: None,
            last_close: None,
            window,
            min_samples,
        }
    }

    /// Record one completed candle.
    ///
    /// True range = max(high − low, |high − prev_close|, |low − prev_close|).
    /// The first candle has no previous close and uses high − low.
    pub fn observe(&mut self, high: Decimal, low: Decimal, close: Decimal) -> Result<()> {
        if close <= Decimal::ZERO || high <= Decimal::ZERO || low <= Decimal::ZERO {
            return Err(StrategyError::InvalidObservation(format!(
                "non-positive candle price: high={high}, low={low}, close={close}"
            )));
        }
        if high < low {
            return Err(StrategyError::InvalidObservation(format!(
                "candle high {high} below low {low}"
            )));
        }

        let range = high - low;
        let tr = match self.prev_close {
            Some(pc) => range.max((high - pc).abs()).max((low - pc).abs()),
            None => range,
        };

        self.true_ranges.push_back(tr);
        while self.true_ranges.len() > self.window {
            self.true_ranges.pop_front();
        }

        self.prev_close = Some(close);
        self.last_close = Some(close);
        Ok(())
    }

    /// Current NATR as a decimal fraction, or `None` while warming up.
    pub fn current(&self) -> Option<Decimal> {
        if self.true_ranges.len() < self.min_samples {
            return None;
        }
        let close = self.last_close?;
        if close <= Decimal::ZERO {
            return None;
        }
        let sum: Decimal = self.true_ranges.iter().copied().sum();
        let avg = sum / Decimal::from(self.true_ranges.len() as u64);
        Some(avg / close)
    }

    /// Like [`current`](Self::current), but as a typed failure for
    /// callers that require a value.
    pub fn require_current(&self) -> Result<Decimal> {
        self.current()
            .ok_or(StrategyError::CalculationNotReady("volatility window warming up"))
    }

    /// Number of true-range samples accumulated.
    pub fn sample_count(&self) -> usize {
        self.true_ranges.len()
    }

    /// Configured window length.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Whether enough samples have accumulated to quote.
    pub fn is_ready(&self) -> bool {
        self.current().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn warmed(window: usize, min: usize, candles: usize) -> NatrEstimator {
        let mut est = NatrEstimator::new(window, min);
        for _ in 0..candles {
            est.observe(dec!(101), dec!(99), dec!(100)).unwrap();
        }
        est
    }

    #[test]
    fn test_unavailable_until_min_samples() {
        let mut est = NatrEstimator::new(5, 5);
        for i in 0..4 {
            assert!(est.current().is_none(), "should be warming up at {i}");
            est.observe(dec!(101), dec!(99), dec!(100)).unwrap();
        }
        assert!(est.current().is_none());
        est.observe(dec!(101), dec!(99), dec!(100)).unwrap();
        assert!(est.current().is_some());
    }

    #[test]
    fn test_require_current_while_warming_up() {
        let est = NatrEstimator::new(5, 5);
        assert!(matches!(
            est.require_current(),
            Err(StrategyError::CalculationNotReady(_))
        ));
    }

    #[test]
    fn test_natr_value_uniform_candles() {
        // Every candle spans 2.0 around a close of 100: NATR = 2/100.
        let est = warmed(5, 5, 5);
        assert_eq!(est.current().unwrap(), dec!(0.02));
    }

    #[test]
    fn test_true_range_uses_prev_close_gap() {
        let mut est = NatrEstimator::new(3, 1);
        est.observe(dec!(100.5), dec!(99.5), dec!(100)).unwrap();
        // Gap up: high-low = 1, but |low - prev_close| = |104 - 100| = 4.
        est.observe(dec!(105), dec!(104), dec!(104.5)).unwrap();
        // TR samples: [1, 5] (high - prev_close = 5 dominates), avg = 3.
        let natr = est.current().unwrap();
        assert_eq!(natr, dec!(3) / dec!(104.5));
    }

    #[test]
    fn test_rolling_window_eviction() {
        let mut est = NatrEstimator::new(3, 1);
        // One wide candle followed by narrow ones; after eviction the
        // wide sample no longer contributes.
        est.observe(dec!(110), dec!(90), dec!(100)).unwrap();
        for _ in 0..3 {
            est.observe(dec!(100.5), dec!(99.5), dec!(100)).unwrap();
        }
        assert_eq!(est.sample_count(), 3);
        assert_eq!(est.current().unwrap(), dec!(0.01));
    }

    #[test]
    fn test_non_positive_close_rejected() {
        let mut est = NatrEstimator::new(5, 1);
        let err = est.observe(dec!(101), dec!(99), Decimal::ZERO);
        assert!(matches!(err, Err(StrategyError::InvalidObservation(_))));
        assert_eq!(est.sample_count(), 0);
    }

    #[test]
    fn test_inverted_candle_rejected() {
        let mut est = NatrEstimator::new(5, 1);
        let err = est.observe(dec!(99), dec!(101), dec!(100));
        assert!(err.is_err());
    }

    #[test]
    fn test_rejected_observation_leaves_state_untouched() {
        let mut est = warmed(5, 5, 5);
        let before = est.current().unwrap();
        let _ = est.observe(dec!(101), dec!(99), dec!(-1));
        assert_eq!(est.current().unwrap(), before);
    }
}
