//! Price trend detection

use crate::config::AnalyticsConfig;
use crate::types::PriceObservation;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Trend classification for a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
    /// Fewer than two observations in the window
    InsufficientData,
    /// Degenerate arithmetic (zero regression denominator, zero first price)
    Error,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Trend::Rising => "rising",
            Trend::Falling => "falling",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
            Trend::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Result of a trend analysis over one lookback window
#[derive(Debug, Clone, PartialEq)]
pub struct TrendResult {
    pub trend: Trend,
    /// Price change per sample from the regression fit
    pub slope: f64,
    /// Percent change between the raw window endpoints
    pub price_change_pct: f64,
    pub avg_volume: f64,
    pub samples: usize,
    /// How much data backs this result (0-1), not a p-value
    pub confidence: f64,
}

impl TrendResult {
    pub fn insufficient_data(samples: usize) -> Self {
        Self {
            trend: Trend::InsufficientData,
            slope: 0.0,
            price_change_pct: 0.0,
            avg_volume: 0.0,
            samples,
            confidence: 0.0,
        }
    }

    pub fn error() -> Self {
        Self {
            trend: Trend::Error,
            slope: 0.0,
            price_change_pct: 0.0,
            avg_volume: 0.0,
            samples: 0,
            confidence: 0.0,
        }
    }
}

/// Fits a least-squares line of price against sample index.
///
/// The independent variable is the sample index rather than the timestamp,
/// so the fit is insensitive to uneven observation spacing. Slope thresholds
/// are absolute price units per sample; callers must keep price units
/// consistent across the window.
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: AnalyticsConfig,
}

impl TrendAnalyzer {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Analyze an ascending-by-timestamp window of observations.
    ///
    /// Total: every input maps to a `TrendResult`; degenerate windows come
    /// back classified as `InsufficientData` or `Error`, never as a panic.
    pub fn analyze(&self, observations: &[PriceObservation]) -> TrendResult {
        let n = observations.len();
        if n < 2 {
            return TrendResult::insufficient_data(n);
        }

        let prices: Vec<f64> = observations
            .iter()
            .map(|o| o.lowest_price.to_f64().unwrap_or(0.0))
            .collect();

        let nf = n as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_x2 = 0.0;
        for (i, price) in prices.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += price;
            sum_xy += x * price;
            sum_x2 += x * x;
        }

        // Unit-spaced indices with n >= 2 cannot zero this out, but guard
        // anyway rather than divide through.
        let denominator = nf * sum_x2 - sum_x * sum_x;
        if denominator == 0.0 {
            return TrendResult::error();
        }
        let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
        if !slope.is_finite() {
            return TrendResult::error();
        }

        let first = prices[0];
        let last = prices[n - 1];
        if first == 0.0 {
            return TrendResult::error();
        }
        let price_change_pct = (last - first) / first * 100.0;

        let avg_volume = observations.iter().map(|o| o.volume as f64).sum::<f64>() / nf;

        let trend = if slope > self.config.rising_slope_threshold {
            Trend::Rising
        } else if slope < self.config.falling_slope_threshold {
            Trend::Falling
        } else {
            Trend::Stable
        };

        let confidence = (nf / self.config.min_data_points as f64).min(1.0);

        TrendResult {
            trend,
            slope,
            price_change_pct,
            avg_volume,
            samples: n,
            confidence,
        }
    }
}
