//! Market access
//!
//! The [`MarketClient`] trait is the bot's only route to the remote
//! marketplace; [`steam`] implements it against the Steam Community Market
//! endpoints. Price strings arrive locale-formatted ("12,34 kr",
//! "$1,234.56"), so parsing lives here next to the trait.

mod steam;

pub use steam::SteamMarketClient;

use crate::error::Result;
use crate::types::{InventoryItem, ItemSnapshot};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current market prices for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOverview {
    pub lowest_price: Option<Decimal>,
    pub median_price: Option<Decimal>,
    pub volume: i64,
}

impl PriceOverview {
    /// Build an [`ItemSnapshot`] from this overview, or `None` when either
    /// price is missing. Expected profit assumes a sale at the median price
    /// minus the market commission.
    pub fn snapshot(
        &self,
        name: &str,
        app_id: u32,
        commission: Decimal,
        min_profit_margin: Decimal,
    ) -> Option<ItemSnapshot> {
        let lowest = self.lowest_price?;
        let median = self.median_price?;
        let expected_profit = (median * (Decimal::ONE - commission) - lowest).round_dp(2);

        Some(ItemSnapshot {
            name: name.to_string(),
            app_id,
            lowest_price: lowest,
            median_price: median,
            volume: self.volume,
            expected_profit,
            is_profitable: expected_profit > min_profit_margin,
        })
    }
}

/// Remote marketplace operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketClient: Send + Sync {
    /// Current price overview for an item, `None` when the market has no
    /// listing data for it
    async fn price_overview(&self, app_id: u32, item_name: &str) -> Result<Option<PriceOverview>>;

    /// Place a buy order at the given unit price
    async fn place_buy_order(&self, app_id: u32, item_name: &str, price: Decimal) -> Result<()>;

    /// List an inventory asset for sale at the given price
    async fn list_for_sale(
        &self,
        app_id: u32,
        context_id: u32,
        asset_id: &str,
        price: Decimal,
    ) -> Result<()>;

    /// The bot account's inventory for one game context
    async fn inventory(&self, app_id: u32, context_id: u32) -> Result<Vec<InventoryItem>>;
}

/// Parse a locale-formatted price string ("12,34 kr", "1 234,56 kr",
/// "$1,234.56") into a decimal amount.
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = if commas > 0 && dots > 0 {
        // The rightmost separator is the decimal point, the other one
        // groups thousands
        if cleaned.rfind(',') > cleaned.rfind('.') {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if commas > 1 {
        cleaned.replace(',', "")
    } else if commas == 1 {
        cleaned.replace(',', ".")
    } else {
        cleaned
    };

    normalized.parse().ok()
}

/// Parse a volume string ("1,234") into a count; malformed input counts as
/// zero volume rather than an error.
pub fn parse_volume(raw: &str) -> i64 {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}
