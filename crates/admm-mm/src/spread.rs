//! Optimal spread calculation.
//!
//! Total spread = γσ²(T − t) + (2/γ)·ln(1 + γ/k), floored at the
//! configured minimum. The first term compensates inventory risk, the
//! second prices the trade-off against order-arrival intensity.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::StrategyParameters;
use crate::error::{Result, StrategyError};

/// Outcome of the spread formula for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpreadQuote {
    /// Total spread in absolute price units, never below the floor.
    pub spread: Decimal,
    /// Whether the floor overrode the formula output.
    pub clamped: bool,
    /// Raw formula output when it was representable; `None` when the
    /// log term failed to produce a finite value.
    pub raw: Option<Decimal>,
}

/// Compute the total optimal spread.
///
/// `sigma` is the current NATR as a decimal fraction. The log term has
/// no closed Decimal form, so it round-trips through f64; a non-finite
/// or non-representable intermediate clamps to the floor instead of
/// propagating.
pub fn total_spread(sigma: Decimal, params: &StrategyParameters) -> Result<SpreadQuote> {
    let gamma = params.risk_aversion;
    let k = params.arrival_rate_k;
    if gamma <= Decimal::ZERO {
        return Err(StrategyError::InvalidParameter {
            name: "risk_aversion",
            value: gamma,
        });
    }
    if k <= Decimal::ZERO {
        return Err(StrategyError::InvalidParameter {
            name: "arrival_rate_k",
            value: k,
        });
    }

    let risk_term = gamma * sigma * sigma * params.time_horizon;

    let log_term = log_term(gamma, k);
    let raw = log_term.map(|lt| risk_term + lt);

    let spread = match raw {
        Some(r) if r >= params.min_spread => r,
        _ => {
            warn!(raw = ?raw, floor = %params.min_spread, "spread clamped to floor");
            params.min_spread
        }
    };

    Ok(SpreadQuote {
        spread,
        clamped: raw.map_or(true, |r| r < params.min_spread),
        raw,
    })
}

/// Half the total spread, the per-side offset from the reservation
/// price. Same contract as [`total_spread`].
pub fn half_spread(sigma: Decimal, params: &StrategyParameters) -> Result<Decimal> {
    Ok(total_spread(sigma, params)?.spread / Decimal::TWO)
}

/// (2/γ)·ln(1 + γ/k), or `None` when the f64 round-trip degenerates.
fn log_term(gamma: Decimal, k: Decimal) -> Option<Decimal> {
    let gamma_f = gamma.to_f64()?;
    let k_f = k.to_f64()?;
    let value = (2.0 / gamma_f) * (1.0 + gamma_f / k_f).ln();
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn params() -> StrategyParameters {
        StrategyParameters {
            risk_aversion: dec!(0.9),
            arrival_rate_k: dec!(1.5),
            time_horizon: dec!(1),
            min_spread: dec!(0.001),
            ..Default::default()
        }
    }

    #[test]
    fn test_reference_spread_value() {
        // γ=0.9, σ=0.02, T−t=1, k=1.5:
        // 0.9 * 0.0004 + (2/0.9) * ln(1.6) ≈ 0.00036 + 1.04445 ≈ 1.04481.
        let q = total_spread(dec!(0.02), &params()).unwrap();
        assert!(!q.clamped);
        let diff = (q.spread - dec!(1.04481)).abs();
        assert!(diff < dec!(0.0001), "spread {} off reference", q.spread);
    }

    #[test]
    fn test_spread_widens_with_volatility() {
        let p = params();
        let low = total_spread(dec!(0.01), &p).unwrap().spread;
        let high = total_spread(dec!(0.05), &p).unwrap().spread;
        assert!(high > low);
    }

    #[test]
    fn test_spread_tightens_with_arrival_rate() {
        let mut p = params();
        let base = total_spread(dec!(0.02), &p).unwrap().spread;
        p.arrival_rate_k = dec!(10);
        let busy = total_spread(dec!(0.02), &p).unwrap().spread;
        assert!(busy < base);
    }

    #[test]
    fn test_floor_applies() {
        // With k huge and γ tiny the formula output drops below the floor.
        let p = StrategyParameters {
            risk_aversion: dec!(0.0000001),
            arrival_rate_k: dec!(1000000),
            min_spread: dec!(0.5),
            ..params()
        };
        let q = total_spread(dec!(0.0001), &p).unwrap();
        assert!(q.clamped);
        assert_eq!(q.spread, dec!(0.5));
        assert!(q.raw.is_some());
    }

    #[test]
    fn test_zero_gamma_is_an_error_not_a_clamp() {
        let p = StrategyParameters {
            risk_aversion: Decimal::ZERO,
            ..params()
        };
        assert!(matches!(
            total_spread(dec!(0.02), &p),
            Err(StrategyError::InvalidParameter {
                name: "risk_aversion",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_k_is_an_error() {
        let p = StrategyParameters {
            arrival_rate_k: Decimal::ZERO,
            ..params()
        };
        assert!(total_spread(dec!(0.02), &p).is_err());
    }

    #[test]
    fn test_half_spread_is_half_the_total() {
        let p = params();
        let total = total_spread(dec!(0.02), &p).unwrap().spread;
        let half = half_spread(dec!(0.02), &p).unwrap();
        assert_eq!(half * dec!(2), total);
    }

    #[test]
    fn test_zero_sigma_still_has_log_term() {
        // Even with no measured volatility the arrival-rate term keeps
        // the spread open.
        let q = total_spread(Decimal::ZERO, &params()).unwrap();
        assert!(q.spread > dec!(1));
    }
}
