//! Store-backed profitability prediction

use super::scorer::{Profitability, ProfitabilityScorer, ProfitabilitySignal};
use crate::analytics::{TrendAnalyzer, VolatilityAnalyzer};
use crate::config::{AnalyticsConfig, MlConfig};
use crate::error::Result;
use crate::storage::MarketStore;
use rust_decimal::Decimal;
use tracing::warn;

/// Size of the profitable-item pool scanned for recommendations
const CANDIDATE_POOL: i64 = 50;

/// A ranked buy recommendation
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub name: String,
    pub price: Decimal,
    pub expected_profit: Decimal,
    pub score: f64,
    pub confidence: f64,
    pub classification: Profitability,
    pub reasons: Vec<String>,
}

/// Assembles scorer inputs from the store and ranks candidates.
///
/// Prediction is total: store failures are logged and mapped to an `Error`
/// signal with zero confidence, so one bad item can never abort a batch scan.
pub struct MlPredictor {
    config: MlConfig,
    scorer: ProfitabilityScorer,
    trend: TrendAnalyzer,
    volatility: VolatilityAnalyzer,
}

impl MlPredictor {
    pub fn new(config: MlConfig, analytics: AnalyticsConfig) -> Self {
        let scorer = ProfitabilityScorer::new(config.feature_weights);
        Self {
            config,
            scorer,
            trend: TrendAnalyzer::new(analytics),
            volatility: VolatilityAnalyzer::new(),
        }
    }

    /// Predict profitability for a single item
    pub async fn predict(&self, store: &dyn MarketStore, item_name: &str) -> ProfitabilitySignal {
        match self.predict_inner(store, item_name).await {
            Ok(signal) => signal,
            Err(e) => {
                warn!(item = item_name, error = %e, "profitability prediction failed");
                ProfitabilitySignal::error(e.to_string())
            }
        }
    }

    async fn predict_inner(
        &self,
        store: &dyn MarketStore,
        item_name: &str,
    ) -> Result<ProfitabilitySignal> {
        let Some(item) = store.item_snapshot(item_name).await? else {
            return Ok(ProfitabilitySignal::unknown());
        };

        let history = store
            .price_history(item_name, self.config.lookback_hours)
            .await?;
        let stats = store.transaction_stats(item_name).await?;

        let trend = self.trend.analyze(&history);
        let volatility = self.volatility.measure(&history);

        Ok(self.scorer.score(&item, &trend, &volatility, &stats))
    }

    /// Rank buy recommendations from the currently-profitable pool.
    ///
    /// Scores every candidate, keeps those whose confidence clears
    /// `min_confidence` (falling back to the configured minimum), and
    /// returns the top `limit` by score.
    pub async fn recommendations(
        &self,
        store: &dyn MarketStore,
        limit: usize,
        min_confidence: Option<f64>,
    ) -> Vec<Recommendation> {
        let min_confidence = min_confidence.unwrap_or(self.config.min_confidence);

        let pool = match store.profitable_items(0, CANDIDATE_POOL).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!(error = %e, "failed to load candidate pool");
                return Vec::new();
            }
        };

        let mut recommendations = Vec::new();
        for item in pool {
            let signal = self.predict(store, &item.name).await;
            if signal.confidence >= min_confidence {
                recommendations.push(Recommendation {
                    name: item.name,
                    price: item.lowest_price,
                    expected_profit: item.expected_profit,
                    score: signal.score,
                    confidence: signal.confidence,
                    classification: signal.classification,
                    reasons: signal.reasons,
                });
            }
        }

        recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
        recommendations.truncate(limit);
        recommendations
    }
}
