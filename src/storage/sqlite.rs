//! SQLite-backed market store

use super::MarketStore;
use crate::error::{BotError, Result};
use crate::types::{ItemSnapshot, PriceObservation, TransactionRecord, TransactionStats};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;

/// Market store on a local SQLite database.
///
/// Monetary values are stored as TEXT so decimal amounts round-trip exactly;
/// numeric ordering on those columns casts in SQL.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and ensure the
    /// schema exists.
    pub async fn connect(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                name            TEXT NOT NULL,
                appid           INTEGER NOT NULL,
                game            TEXT NOT NULL,
                lowest_price    TEXT NOT NULL,
                median_price    TEXT NOT NULL,
                volume          INTEGER NOT NULL,
                expected_profit TEXT NOT NULL,
                is_profitable   INTEGER NOT NULL,
                last_checked    TEXT NOT NULL,
                PRIMARY KEY (name, appid)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS price_history (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                item_name    TEXT NOT NULL,
                appid        INTEGER NOT NULL,
                game         TEXT NOT NULL,
                lowest_price TEXT NOT NULL,
                median_price TEXT NOT NULL,
                volume       INTEGER NOT NULL,
                timestamp    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_price_history_item ON price_history(item_name)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_price_history_timestamp ON price_history(timestamp)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id        TEXT PRIMARY KEY,
                item_name TEXT NOT NULL,
                appid     INTEGER NOT NULL,
                game      TEXT NOT NULL,
                kind      TEXT NOT NULL,
                price     TEXT NOT NULL,
                quantity  INTEGER NOT NULL,
                status    TEXT NOT NULL,
                details   TEXT NOT NULL,
                timestamp TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_transactions_item ON transactions(item_name)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn cutoff(lookback_hours: i64) -> DateTime<Utc> {
        Utc::now() - Duration::hours(lookback_hours)
    }
}

fn parse_money(what: &'static str, raw: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| BotError::parse(what, raw))
}

fn snapshot_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ItemSnapshot> {
    Ok(ItemSnapshot {
        name: row.try_get("name")?,
        app_id: row.try_get::<i64, _>("appid")? as u32,
        lowest_price: parse_money("lowest_price", &row.try_get::<String, _>("lowest_price")?)?,
        median_price: parse_money("median_price", &row.try_get::<String, _>("median_price")?)?,
        volume: row.try_get("volume")?,
        expected_profit: parse_money(
            "expected_profit",
            &row.try_get::<String, _>("expected_profit")?,
        )?,
        is_profitable: row.try_get("is_profitable")?,
    })
}

#[async_trait]
impl MarketStore for SqliteStore {
    async fn upsert_item(&self, item: &ItemSnapshot, game: &str) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO items
                (name, appid, game, lowest_price, median_price, volume,
                 expected_profit, is_profitable, last_checked)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (name, appid) DO UPDATE SET
                lowest_price = excluded.lowest_price,
                median_price = excluded.median_price,
                volume = excluded.volume,
                expected_profit = excluded.expected_profit,
                is_profitable = excluded.is_profitable,
                last_checked = excluded.last_checked
            "#,
        )
        .bind(&item.name)
        .bind(item.app_id as i64)
        .bind(game)
        .bind(item.lowest_price.to_string())
        .bind(item.median_price.to_string())
        .bind(item.volume)
        .bind(item.expected_profit.to_string())
        .bind(item.is_profitable)
        .bind(now)
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO price_history
                (item_name, appid, game, lowest_price, median_price, volume, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&item.name)
        .bind(item.app_id as i64)
        .bind(game)
        .bind(item.lowest_price.to_string())
        .bind(item.median_price.to_string())
        .bind(item.volume)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn item_snapshot(&self, name: &str) -> Result<Option<ItemSnapshot>> {
        let row = sqlx::query(
            r#"
            SELECT name, appid, lowest_price, median_price, volume,
                   expected_profit, is_profitable
            FROM items
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| snapshot_from_row(&r)).transpose()
    }

    async fn price_history(
        &self,
        name: &str,
        lookback_hours: i64,
    ) -> Result<Vec<PriceObservation>> {
        let rows = sqlx::query(
            r#"
            SELECT item_name, lowest_price, median_price, volume, timestamp
            FROM price_history
            WHERE item_name = ? AND timestamp > ?
            ORDER BY timestamp ASC, id ASC
            "#,
        )
        .bind(name)
        .bind(Self::cutoff(lookback_hours))
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PriceObservation {
                    item_name: row.try_get("item_name")?,
                    lowest_price: parse_money(
                        "lowest_price",
                        &row.try_get::<String, _>("lowest_price")?,
                    )?,
                    median_price: parse_money(
                        "median_price",
                        &row.try_get::<String, _>("median_price")?,
                    )?,
                    volume: row.try_get("volume")?,
                    timestamp: row.try_get("timestamp")?,
                })
            })
            .collect()
    }

    async fn tracked_items(
        &self,
        lookback_hours: i64,
        min_observations: i64,
    ) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT item_name
            FROM price_history
            WHERE timestamp > ?
            GROUP BY item_name
            HAVING COUNT(*) >= ?
            ORDER BY item_name
            "#,
        )
        .bind(Self::cutoff(lookback_hours))
        .bind(min_observations)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Ok(row.try_get("item_name")?))
            .collect()
    }

    async fn profitable_items(&self, min_volume: i64, limit: i64) -> Result<Vec<ItemSnapshot>> {
        let rows = sqlx::query(
            r#"
            SELECT name, appid, lowest_price, median_price, volume,
                   expected_profit, is_profitable
            FROM items
            WHERE is_profitable = 1 AND volume > ?
            ORDER BY CAST(expected_profit AS REAL) DESC
            LIMIT ?
            "#,
        )
        .bind(min_volume)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(snapshot_from_row).collect()
    }

    async fn transaction_stats(&self, name: &str) -> Result<TransactionStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN kind = 'buy' AND status = 'success' THEN 1 ELSE 0 END), 0)
                    AS successful_buys,
                COALESCE(SUM(CASE WHEN kind = 'sell' AND status = 'success' THEN 1 ELSE 0 END), 0)
                    AS successful_sells
            FROM transactions
            WHERE item_name = ?
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(TransactionStats {
            successful_buys: row.try_get::<i64, _>("successful_buys")? as u32,
            successful_sells: row.try_get::<i64, _>("successful_sells")? as u32,
        })
    }

    async fn last_successful_buy(&self, name: &str) -> Result<Option<Decimal>> {
        let row = sqlx::query(
            r#"
            SELECT price
            FROM transactions
            WHERE item_name = ? AND kind = 'buy' AND status = 'success'
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| parse_money("price", &r.try_get::<String, _>("price")?))
            .transpose()
    }

    async fn record_transaction(&self, tx: &TransactionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, item_name, appid, game, kind, price, quantity, status, details, timestamp)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(tx.id.to_string())
        .bind(&tx.item_name)
        .bind(tx.app_id as i64)
        .bind(&tx.game)
        .bind(tx.kind.to_string())
        .bind(tx.price.to_string())
        .bind(tx.quantity as i64)
        .bind(tx.status.to_string())
        .bind(&tx.details)
        .bind(tx.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
