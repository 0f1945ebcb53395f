//! Core domain types shared across the bot

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single price/volume observation for an item, as recorded in the
/// price history. Observations are immutable once written and are always
/// read back in ascending timestamp order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceObservation {
    pub item_name: String,
    pub lowest_price: Decimal,
    pub median_price: Decimal,
    pub volume: i64,
    pub timestamp: DateTime<Utc>,
}

/// Current market snapshot for an item (latest fetched state)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub name: String,
    pub app_id: u32,
    pub lowest_price: Decimal,
    pub median_price: Decimal,
    pub volume: i64,
    /// Expected profit per unit after market commission
    pub expected_profit: Decimal,
    pub is_profitable: bool,
}

/// Historical buy/sell success counts for an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionStats {
    pub successful_buys: u32,
    pub successful_sells: u32,
}

impl TransactionStats {
    /// Sell-through ratio; the buy count is floored at 1 so items with
    /// recorded sells but no recorded buys still produce a ratio.
    pub fn success_ratio(&self) -> f64 {
        f64::from(self.successful_sells) / f64::from(self.successful_buys.max(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
            TransactionKind::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Success => write!(f, "success"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

/// A row in the transaction ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub item_name: String,
    pub app_id: u32,
    pub game: String,
    pub kind: TransactionKind,
    pub price: Decimal,
    pub quantity: u32,
    pub status: TransactionStatus,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn new(
        item_name: impl Into<String>,
        app_id: u32,
        game: impl Into<String>,
        kind: TransactionKind,
        price: Decimal,
        status: TransactionStatus,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_name: item_name.into(),
            app_id,
            game: game.into(),
            kind,
            price,
            quantity: 1,
            status,
            details: details.into(),
            timestamp: Utc::now(),
        }
    }
}

/// An item sitting in the bot's inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub asset_id: String,
    pub market_hash_name: String,
    pub marketable: bool,
}
