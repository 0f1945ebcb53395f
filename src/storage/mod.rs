//! Persistence layer
//!
//! The analytics/decision core never touches storage directly; everything it
//! needs arrives through the [`MarketStore`] trait. The SQLite
//! implementation lives in [`sqlite`].

mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::{ItemSnapshot, PriceObservation, TransactionRecord, TransactionStats};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read/write access to market snapshots, price history, and the
/// transaction ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Update the current snapshot for an item and append it to the price
    /// history.
    async fn upsert_item(&self, item: &ItemSnapshot, game: &str) -> Result<()>;

    /// Latest market snapshot for an item, if one has been recorded
    async fn item_snapshot(&self, name: &str) -> Result<Option<ItemSnapshot>>;

    /// Price observations within the lookback window, ascending by timestamp
    async fn price_history(&self, name: &str, lookback_hours: i64)
        -> Result<Vec<PriceObservation>>;

    /// Names of items with at least `min_observations` observations inside
    /// the lookback window
    async fn tracked_items(&self, lookback_hours: i64, min_observations: i64)
        -> Result<Vec<String>>;

    /// Currently profitable items above `min_volume`, most profitable first
    async fn profitable_items(&self, min_volume: i64, limit: i64) -> Result<Vec<ItemSnapshot>>;

    /// Successful buy/sell counts for an item
    async fn transaction_stats(&self, name: &str) -> Result<TransactionStats>;

    /// Price of the most recent successful buy for an item
    async fn last_successful_buy(&self, name: &str) -> Result<Option<Decimal>>;

    /// Append a row to the transaction ledger
    async fn record_transaction(&self, tx: &TransactionRecord) -> Result<()>;
}
