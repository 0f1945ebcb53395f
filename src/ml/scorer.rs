//! Weighted profitability scoring

use crate::analytics::{Trend, TrendResult, Volatility};
use crate::config::FeatureWeights;
use crate::types::{ItemSnapshot, TransactionStats};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Profitability classification bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profitability {
    HighlyProfitable,
    Profitable,
    Moderate,
    NotProfitable,
    /// Item has no current-market record
    Unknown,
    /// An upstream lookup failed
    Error,
}

impl std::fmt::Display for Profitability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Profitability::HighlyProfitable => "highly_profitable",
            Profitability::Profitable => "profitable",
            Profitability::Moderate => "moderate",
            Profitability::NotProfitable => "not_profitable",
            Profitability::Unknown => "unknown",
            Profitability::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// The inputs a score was computed from, kept for display and audit
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    pub expected_profit: Decimal,
    pub volume: i64,
    pub trend: Trend,
    pub volatility: f64,
    pub price_change_pct: f64,
}

/// Scored profitability signal for one item
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitabilitySignal {
    /// Composite score, always within [0, 100]
    pub score: f64,
    pub classification: Profitability,
    /// score / 100
    pub confidence: f64,
    /// Why the score came out the way it did, in factor order
    pub reasons: Vec<String>,
    /// Absent for `Unknown`/`Error` signals
    pub features: Option<FeatureSnapshot>,
}

impl ProfitabilitySignal {
    pub fn unknown() -> Self {
        Self {
            score: 0.0,
            classification: Profitability::Unknown,
            confidence: 0.0,
            reasons: vec!["No market data".to_string()],
            features: None,
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            classification: Profitability::Error,
            confidence: 0.0,
            reasons: vec![detail.into()],
            features: None,
        }
    }
}

/// Additive rule-table scorer.
///
/// Each factor contributes a bounded amount and appends a reason; the sum is
/// clamped to [0, 100]. The weights are an explicit immutable input, so two
/// calls with identical arguments always produce identical signals.
#[derive(Debug, Clone, Copy)]
pub struct ProfitabilityScorer {
    weights: FeatureWeights,
}

impl ProfitabilityScorer {
    pub fn new(weights: FeatureWeights) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        item: &ItemSnapshot,
        trend: &TrendResult,
        volatility: &Volatility,
        history: &TransactionStats,
    ) -> ProfitabilitySignal {
        let w = &self.weights;
        let mut score = 0.0;
        let mut reasons = Vec::new();

        // 1. Expected profit
        if item.expected_profit > dec!(5) {
            score += w.expected_profit;
            reasons.push("High profit margin".to_string());
        } else if item.expected_profit > dec!(2) {
            score += w.expected_profit / 2.0;
            reasons.push("Moderate profit margin".to_string());
        }

        // 2. Trading volume
        if item.volume > 50 {
            score += w.volume;
            reasons.push("High trading volume".to_string());
        } else if item.volume > 10 {
            score += w.volume / 2.0;
            reasons.push("Moderate volume".to_string());
        }

        // 3. Price trend (falling carries a flat penalty, not a weighted one)
        if trend.trend == Trend::Rising && trend.confidence > 0.5 {
            score += w.trend;
            reasons.push("Rising price trend".to_string());
        } else if trend.trend == Trend::Stable {
            score += w.trend / 2.0;
            reasons.push("Stable price".to_string());
        } else if trend.trend == Trend::Falling {
            score -= 10.0;
            reasons.push("Falling price (risky)".to_string());
        }

        // 4. Volatility (flat penalty above the moderate band)
        if volatility.value < 5.0 {
            score += w.volatility;
            reasons.push("Low volatility (stable)".to_string());
        } else if volatility.value < 15.0 {
            score += w.volatility / 2.0;
            reasons.push("Moderate volatility".to_string());
        } else {
            score -= 5.0;
            reasons.push("High volatility (risky)".to_string());
        }

        // 5. Historical success, skipped entirely without any recorded sells
        if history.successful_sells > 0 {
            let ratio = history.success_ratio();
            if ratio > 0.8 {
                score += w.historical_success;
                reasons.push("Strong historical performance".to_string());
            } else if ratio > 0.5 {
                score += w.historical_success / 2.0;
                reasons.push("Moderate historical performance".to_string());
            }
        }

        let score = score.clamp(0.0, 100.0);
        let classification = if score >= 70.0 {
            Profitability::HighlyProfitable
        } else if score >= 50.0 {
            Profitability::Profitable
        } else if score >= 30.0 {
            Profitability::Moderate
        } else {
            Profitability::NotProfitable
        };

        ProfitabilitySignal {
            score,
            classification,
            confidence: score / 100.0,
            reasons,
            features: Some(FeatureSnapshot {
                expected_profit: item.expected_profit,
                volume: item.volume,
                trend: trend.trend,
                volatility: volatility.value,
                price_change_pct: trend.price_change_pct,
            }),
        }
    }
}
