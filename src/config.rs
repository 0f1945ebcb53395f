//! Bot configuration
//!
//! All tunables live here as per-section structs. Each section has serde
//! defaults mirroring the stock configuration, so a partial (or empty) TOML
//! file still yields a working config. Sections are plain immutable values:
//! components receive a snapshot at construction and never share mutable
//! configuration state.

use crate::error::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trading: TradingConfig,
    pub risk: RiskConfig,
    pub ml: MlConfig,
    pub pricing: PricingConfig,
    pub analytics: AnalyticsConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    /// Item names to never buy, regardless of score
    pub blacklist: Vec<String>,
}

impl Config {
    /// Load configuration from a TOML file with `BOT_*` environment
    /// overrides. A missing file falls back to defaults.
    pub fn load(path: &str) -> Result<Config> {
        let expanded = shellexpand::tilde(path);
        let settings = config::Config::builder()
            .add_source(config::File::with_name(expanded.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("BOT").separator("__"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}

/// Buy-side trading settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    /// Maximum price per item in the configured currency
    pub max_price_per_item: Decimal,
    /// Minimum trading volume to consider an item
    pub min_volume: i64,
    /// Minimum expected profit for an item to count as profitable
    pub min_profit_margin: Decimal,
    /// Market commission taken on sales (0.15 = 15%)
    pub commission_rate: Decimal,
    /// Amount added above the lowest ask when placing a buy order
    pub price_increment: Decimal,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            max_price_per_item: dec!(100),
            min_volume: 5,
            min_profit_margin: dec!(2),
            commission_rate: dec!(0.15),
            price_increment: dec!(0.01),
        }
    }
}

/// Sell-side risk thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Sell if loss exceeds this percentage
    pub stop_loss_percent: Decimal,
    /// Sell when profit reaches this percentage
    pub take_profit_percent: Decimal,
    /// Minimum absolute profit before selling
    pub min_profit_to_sell: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            stop_loss_percent: dec!(10),
            take_profit_percent: dec!(20),
            min_profit_to_sell: dec!(0.50),
        }
    }
}

/// Feature weights for the profitability scorer
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub expected_profit: f64,
    pub volume: f64,
    pub trend: f64,
    pub volatility: f64,
    pub historical_success: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            expected_profit: 30.0,
            volume: 20.0,
            trend: 25.0,
            volatility: 15.0,
            historical_success: 10.0,
        }
    }
}

/// Profitability prediction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MlConfig {
    /// Minimum confidence for recommendations (0-1)
    pub min_confidence: f64,
    /// Lookback window for the prediction-side trend/volatility inputs
    pub lookback_hours: i64,
    pub feature_weights: FeatureWeights,
}

impl Default for MlConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            lookback_hours: 48,
            feature_weights: FeatureWeights::default(),
        }
    }
}

/// Dynamic pricing tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Base markup fraction (0.05 = +5%)
    pub base_markup: Decimal,
    /// Volume threshold for "high demand"
    pub high_volume_threshold: i64,
    /// Extra markup for high volume
    pub high_volume_bonus: Decimal,
    /// Extra markup for rising prices
    pub rising_trend_bonus: Decimal,
    /// Markup adjustment for falling prices (negative)
    pub falling_trend_penalty: Decimal,
    pub min_markup: Decimal,
    pub max_markup: Decimal,
    /// Absolute minimum listing price
    pub floor_price: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_markup: dec!(0.05),
            high_volume_threshold: 100,
            high_volume_bonus: dec!(0.10),
            rising_trend_bonus: dec!(0.08),
            falling_trend_penalty: dec!(-0.05),
            min_markup: dec!(-0.05),
            max_markup: dec!(0.25),
            floor_price: dec!(1.00),
        }
    }
}

/// Trend/volatility analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Hours of history to analyze for trends
    pub trend_hours: i64,
    /// Minimum observations before trend confidence saturates
    pub min_data_points: usize,
    /// Hours of history for volatility
    pub volatility_window_hours: i64,
    /// Slope above which a trend counts as rising (price units per sample)
    pub rising_slope_threshold: f64,
    /// Slope below which a trend counts as falling
    pub falling_slope_threshold: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            trend_hours: 24,
            min_data_points: 5,
            volatility_window_hours: 24,
            rising_slope_threshold: 0.1,
            falling_slope_threshold: -0.1,
        }
    }
}

/// Remote API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Steam currency code (20 = NOK)
    pub currency: u32,
    pub country: String,
    /// Steam account id, required for inventory fetches
    pub steam_id: String,
    /// Pre-established session cookie header; session management itself
    /// happens outside the bot
    pub session_cookie: String,
    pub user_agent: String,
    /// Base delay between API requests (ms)
    pub request_delay_ms: u64,
    /// Uniform random jitter added to the base delay (ms)
    pub request_delay_jitter_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://steamcommunity.com".to_string(),
            currency: 20,
            country: "NO".to_string(),
            steam_id: String::new(),
            session_cookie: String::new(),
            user_agent: "Mozilla/5.0".to_string(),
            request_delay_ms: 2500,
            request_delay_jitter_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/bot.db".to_string(),
        }
    }
}
