//! Market analytics
//!
//! Pure computations over ordered price history:
//! - Trend detection via least-squares regression
//! - Volatility scoring (population standard deviation over mean)
//! - Trending-item ranking
//!
//! Nothing in this module performs I/O or keeps state between calls; every
//! function is a deterministic map from its input window and configuration.

mod trend;
mod volatility;


pub use trend::{Trend, TrendAnalyzer, TrendResult};
pub use volatility::{Volatility, VolatilityAnalyzer, VolatilityBasis};

/// An item ranked by trend strength
#[derive(Debug, Clone)]
pub struct TrendingItem {
    pub name: String,
    pub result: TrendResult,
}

/// Rank items whose trend matches `direction` with confidence above 0.5,
/// strongest absolute slope first, truncated to `limit`.
pub fn rank_trending(
    entries: Vec<(String, TrendResult)>,
    direction: Trend,
    limit: usize,
) -> Vec<TrendingItem> {
    let mut trending: Vec<TrendingItem> = entries
        .into_iter()
        .filter(|(_, r)| r.trend == direction && r.confidence > 0.5)
        .map(|(name, result)| TrendingItem { name, result })
        .collect();

    trending.sort_by(|a, b| b.result.slope.abs().total_cmp(&a.result.slope.abs()));
    trending.truncate(limit);
    trending
}
