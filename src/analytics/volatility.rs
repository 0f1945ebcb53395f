//! Price volatility scoring

use crate::types::PriceObservation;
use rust_decimal::prelude::ToPrimitive;

/// How a volatility value was produced.
///
/// A plain zero is ambiguous between "constant prices" and "could not be
/// computed"; the basis keeps the two cases apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolatilityBasis {
    /// Computed from a sufficient, well-formed window
    Computed,
    /// Fewer than three observations
    InsufficientData,
    /// Zero or non-finite mean price
    DegenerateMean,
}

/// Normalized price dispersion for one window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volatility {
    /// Population standard deviation as a percentage of the mean price
    pub value: f64,
    pub basis: VolatilityBasis,
}

impl Volatility {
    pub fn is_computed(&self) -> bool {
        self.basis == VolatilityBasis::Computed
    }
}

/// Measures price dispersion over a lookback window
#[derive(Debug, Clone, Copy, Default)]
pub struct VolatilityAnalyzer;

impl VolatilityAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Population standard deviation of the lowest prices, normalized as a
    /// percentage of the mean. Never fails: degenerate windows come back as
    /// zero with a non-`Computed` basis.
    pub fn measure(&self, observations: &[PriceObservation]) -> Volatility {
        if observations.len() < 3 {
            return Volatility {
                value: 0.0,
                basis: VolatilityBasis::InsufficientData,
            };
        }

        let prices: Vec<f64> = observations
            .iter()
            .map(|o| o.lowest_price.to_f64().unwrap_or(0.0))
            .collect();
        let n = prices.len() as f64;
        let mean = prices.iter().sum::<f64>() / n;
        if mean == 0.0 || !mean.is_finite() {
            return Volatility {
                value: 0.0,
                basis: VolatilityBasis::DegenerateMean,
            };
        }

        // Population variance (divide by n, not n - 1)
        let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n;
        let value = variance.sqrt() / mean * 100.0;

        Volatility {
            value,
            basis: VolatilityBasis::Computed,
        }
    }
}
