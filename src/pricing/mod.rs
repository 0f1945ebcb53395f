//! Dynamic listing markup
//!
//! Computes the markup applied on top of the median price when listing an
//! item for sale. Demand (volume), direction (trend), and price band each
//! nudge the base markup; the result is clamped to the configured range and
//! the final listing price never drops below the floor.

use crate::analytics::Trend;
use crate::config::PricingConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Computes sale markups from market conditions
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Markup fraction for a listing (0.05 = +5%), clamped to
    /// `[min_markup, max_markup]`.
    pub fn markup(&self, volume: i64, trend: Trend, median_price: Decimal) -> Decimal {
        let cfg = &self.config;
        let mut markup = cfg.base_markup;

        // Volume tier
        if volume > cfg.high_volume_threshold {
            markup += cfg.high_volume_bonus;
        } else if volume > cfg.high_volume_threshold / 2 {
            markup += cfg.high_volume_bonus / dec!(2);
        } else if volume < 10 {
            markup -= dec!(0.02);
        }

        // Trend tier (the falling penalty is negative)
        match trend {
            Trend::Rising => markup += cfg.rising_trend_bonus,
            Trend::Falling => markup += cfg.falling_trend_penalty,
            _ => {}
        }

        // Price band: expensive items get a slimmer margin
        if median_price > dec!(100) {
            markup -= dec!(0.03);
        } else if median_price > dec!(50) {
            markup -= dec!(0.01);
        }

        markup.clamp(cfg.min_markup, cfg.max_markup)
    }

    /// Listing price for a given median and markup, floored at the
    /// configured minimum.
    pub fn sell_price(&self, median_price: Decimal, markup: Decimal) -> Decimal {
        (median_price * (Decimal::ONE + markup)).max(self.config.floor_price)
    }
}
