//! Strategy configuration.
//!
//! Parameters are immutable for a session. A hot reload replaces the
//! whole value; nothing mutates a live `StrategyParameters` in place.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

/// Avellaneda-Stoikov strategy parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyParameters {
    /// Instrument to quote, e.g. "SOL-USDT".
    #[serde(default = "default_trading_pair")]
    pub trading_pair: String,

    /// Risk aversion γ. Higher values widen the spread and strengthen
    /// the inventory skew. Must be strictly positive.
    #[serde(default = "default_risk_aversion")]
    pub risk_aversion: Decimal,

    /// Order-arrival-rate parameter k. Higher k justifies tighter
    /// spreads. Must be strictly positive.
    #[serde(default = "default_arrival_rate_k")]
    pub arrival_rate_k: Decimal,

    /// Remaining session length (T − t) used by both the reservation
    /// price and the spread formula. An always-on session keeps a fixed
    /// positive constant here; zero would erase all inventory skew.
    #[serde(default = "default_time_horizon")]
    pub time_horizon: Decimal,

    /// Minimum total spread as a decimal fraction of price units.
    #[serde(default = "default_min_spread")]
    pub min_spread: Decimal,

    /// Quote size in base units, both sides.
    #[serde(default = "default_order_amount")]
    pub order_amount: Decimal,

    /// Target fraction of total position value held in the base asset.
    #[serde(default = "default_target_base_ratio")]
    pub target_base_ratio: Decimal,

    /// Quote refresh interval in milliseconds.
    #[serde(default = "default_order_refresh_time_ms")]
    pub order_refresh_time_ms: u64,

    /// Quote drift (bps vs. resting quotes) that forces a refresh
    /// before the interval elapses.
    #[serde(default = "default_refresh_tolerance_bps")]
    pub refresh_tolerance_bps: Decimal,

    /// Rolling window length for the NATR estimate, in candles.
    #[serde(default = "default_natr_window")]
    pub natr_window: usize,

    /// True-range samples required before NATR is considered valid.
    /// Defaults to a full window.
    #[serde(default = "default_natr_min_samples")]
    pub natr_min_samples: usize,

    /// Maximum placement/cancel retries before quoting suspends.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff between retries in milliseconds (doubles per attempt).
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Consecutive not-ready ticks tolerated before the condition is
    /// reported at warn level.
    #[serde(default = "default_not_ready_report_ticks")]
    pub not_ready_report_ticks: u32,

    /// Absolute inventory skew beyond which the size on the worsening
    /// side is scaled down. Zero disables the size skew.
    #[serde(default = "default_size_skew_limit")]
    pub size_skew_limit: Decimal,

    /// Keep the bid at or below the best bid and the ask at or above
    /// the best ask so quotes always rest passively.
    #[serde(default = "default_true")]
    pub clamp_to_book: bool,
}

impl Default for StrategyParameters {
    fn default() -> Self {
        Self {
            trading_pair: default_trading_pair(),
            risk_aversion: default_risk_aversion(),
            arrival_rate_k: default_arrival_rate_k(),
            time_horizon: default_time_horizon(),
            min_spread: default_min_spread(),
            order_amount: default_order_amount(),
            target_base_ratio: default_target_base_ratio(),
            order_refresh_time_ms: default_order_refresh_time_ms(),
            refresh_tolerance_bps: default_refresh_tolerance_bps(),
            natr_window: default_natr_window(),
            natr_min_samples: default_natr_min_samples(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            not_ready_report_ticks: default_not_ready_report_ticks(),
            size_skew_limit: default_size_skew_limit(),
            clamp_to_book: true,
        }
    }
}

impl StrategyParameters {
    /// Validate the configuration at load time.
    ///
    /// Degenerate values (γ ≤ 0, k ≤ 0, zero horizon) make the spread
    /// formula undefined; they are rejected here so the strategy never
    /// starts with them rather than clamped later.
    pub fn validate(&self) -> Result<()> {
        if self.risk_aversion <= Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "risk_aversion",
                value: self.risk_aversion,
            });
        }
        if self.arrival_rate_k <= Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "arrival_rate_k",
                value: self.arrival_rate_k,
            });
        }
        if self.time_horizon <= Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "time_horizon",
                value: self.time_horizon,
            });
        }
        if self.min_spread < Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "min_spread",
                value: self.min_spread,
            });
        }
        if self.order_amount <= Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "order_amount",
                value: self.order_amount,
            });
        }
        if self.target_base_ratio < Decimal::ZERO || self.target_base_ratio > Decimal::ONE {
            return Err(StrategyError::InvalidParameter {
                name: "target_base_ratio",
                value: self.target_base_ratio,
            });
        }
        if self.order_refresh_time_ms == 0 {
            return Err(StrategyError::InvalidParameter {
                name: "order_refresh_time_ms",
                value: Decimal::ZERO,
            });
        }
        if self.natr_window == 0 {
            return Err(StrategyError::InvalidParameter {
                name: "natr_window",
                value: Decimal::ZERO,
            });
        }
        if self.natr_min_samples == 0 || self.natr_min_samples > self.natr_window {
            return Err(StrategyError::InvalidParameter {
                name: "natr_min_samples",
                value: Decimal::from(self.natr_min_samples as u64),
            });
        }
        if self.refresh_tolerance_bps < Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "refresh_tolerance_bps",
                value: self.refresh_tolerance_bps,
            });
        }
        if self.size_skew_limit < Decimal::ZERO {
            return Err(StrategyError::InvalidParameter {
                name: "size_skew_limit",
                value: self.size_skew_limit,
            });
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_trading_pair() -> String {
    "SOL-USDT".to_string()
}
fn default_risk_aversion() -> Decimal {
    Decimal::new(9, 1) // 0.9
}
fn default_arrival_rate_k() -> Decimal {
    Decimal::new(15, 1) // 1.5
}
fn default_time_horizon() -> Decimal {
    Decimal::ONE // always-on session: fixed positive constant
}
fn default_min_spread() -> Decimal {
    Decimal::new(1, 3) // 0.001
}
fn default_order_amount() -> Decimal {
    Decimal::ONE
}
fn default_target_base_ratio() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_order_refresh_time_ms() -> u64 {
    15_000 // 15 seconds
}
fn default_refresh_tolerance_bps() -> Decimal {
    Decimal::TWO // 2 bps
}
fn default_natr_window() -> usize {
    30 // 30 one-minute candles
}
fn default_natr_min_samples() -> usize {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_not_ready_report_ticks() -> u32 {
    20
}
fn default_size_skew_limit() -> Decimal {
    Decimal::new(4, 1) // 0.4
}
