//! Trading pipelines
//!
//! Wires the analytics/decision core to the store and market client:
//! price refresh, buy (ranked and recommendation-driven), auto-sell, and
//! CSV export. All remote calls are paced with a randomized delay to stay
//! inside the market's rate limit.
//!
//! One bad item never aborts a batch: per-item failures are logged,
//! recorded in the ledger where relevant, and the loop moves on.


use crate::allocator::{BudgetAllocator, BuyCandidate, PlannedPurchase, PurchasePlan};
use crate::analytics::{
    rank_trending, Trend, TrendAnalyzer, TrendResult, TrendingItem, Volatility,
    VolatilityAnalyzer,
};
use crate::client::MarketClient;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::games::{self, Game};
use crate::ml::{MlPredictor, ProfitabilitySignal, Recommendation};
use crate::pricing::PricingEngine;
use crate::risk::{RiskDecision, RiskManager, Urgency};
use crate::storage::MarketStore;
use crate::types::{TransactionKind, TransactionRecord, TransactionStatus};
use rand::Rng;
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of one buy pass
#[derive(Debug, Clone, Default)]
pub struct PurchaseSummary {
    pub orders_placed: usize,
    pub total_spent: Decimal,
    pub purchased: Vec<PlannedPurchase>,
}

/// Outcome of one auto-sell pass
#[derive(Debug, Clone, Default)]
pub struct SellSummary {
    pub listed: usize,
    pub revenue: Decimal,
    pub held: usize,
}

/// Outcome of one price refresh pass
#[derive(Debug, Clone, Default)]
pub struct RefreshSummary {
    pub updated: usize,
    pub skipped: usize,
}

/// Trend and volatility for one item, for display
#[derive(Debug, Clone)]
pub struct ItemAnalysis {
    pub trend: TrendResult,
    pub volatility: Volatility,
}

/// The trading bot for one game marketplace
pub struct TradingBot<S, C> {
    store: S,
    client: C,
    config: Config,
    game: &'static Game,
    trend: TrendAnalyzer,
    volatility: VolatilityAnalyzer,
    predictor: MlPredictor,
    risk: RiskManager,
    pricing: PricingEngine,
    allocator: BudgetAllocator,
}

impl<S, C> TradingBot<S, C>
where
    S: MarketStore,
    C: MarketClient,
{
    pub fn new(store: S, client: C, config: Config, game_key: &str) -> Result<Self> {
        let game =
            games::get(game_key).ok_or_else(|| BotError::UnknownGame(game_key.to_string()))?;

        let trend = TrendAnalyzer::new(config.analytics.clone());
        let predictor = MlPredictor::new(config.ml.clone(), config.analytics.clone());
        let risk = RiskManager::new(config.risk.clone());
        let pricing = PricingEngine::new(config.pricing.clone());
        let allocator = BudgetAllocator::new(
            config.trading.price_increment,
            config.trading.max_price_per_item,
            config.blacklist.clone(),
        );

        Ok(Self {
            store,
            client,
            config,
            game,
            trend,
            volatility: VolatilityAnalyzer::new(),
            predictor,
            risk,
            pricing,
            allocator,
        })
    }

    pub fn game(&self) -> &'static Game {
        self.game
    }

    /// Fetch current prices for every tracked item and store snapshots
    pub async fn refresh_prices(&self) -> Result<RefreshSummary> {
        info!(
            game = self.game.name,
            items = self.game.items.len(),
            "refreshing market prices"
        );

        let mut summary = RefreshSummary::default();
        for &item_name in self.game.items {
            match self.client.price_overview(self.game.app_id, item_name).await {
                Ok(Some(overview)) => {
                    let snapshot = overview.snapshot(
                        item_name,
                        self.game.app_id,
                        self.config.trading.commission_rate,
                        self.config.trading.min_profit_margin,
                    );
                    match snapshot {
                        Some(snapshot) => {
                            debug!(
                                item = item_name,
                                profit = %snapshot.expected_profit,
                                "storing snapshot"
                            );
                            self.store.upsert_item(&snapshot, self.game.key).await?;
                            summary.updated += 1;
                        }
                        None => {
                            debug!(item = item_name, "incomplete price data");
                            summary.skipped += 1;
                        }
                    }
                }
                Ok(None) => {
                    debug!(item = item_name, "no market data");
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(item = item_name, error = %e, "price fetch failed");
                    summary.skipped += 1;
                }
            }
            self.pace().await;
        }

        Ok(summary)
    }

    /// Trend and volatility for one item over the configured windows
    pub async fn analyze(&self, item_name: &str) -> Result<ItemAnalysis> {
        let trend_history = self
            .store
            .price_history(item_name, self.config.analytics.trend_hours)
            .await?;
        let vol_history = self
            .store
            .price_history(item_name, self.config.analytics.volatility_window_hours)
            .await?;

        Ok(ItemAnalysis {
            trend: self.trend.analyze(&trend_history),
            volatility: self.volatility.measure(&vol_history),
        })
    }

    /// Profitability signal for one item
    pub async fn predict(&self, item_name: &str) -> ProfitabilitySignal {
        self.predictor.predict(&self.store, item_name).await
    }

    /// Items with the strongest trends in the requested direction
    pub async fn trending(&self, direction: Trend, limit: usize) -> Result<Vec<TrendingItem>> {
        let names = self
            .store
            .tracked_items(
                self.config.analytics.trend_hours,
                self.config.analytics.min_data_points as i64,
            )
            .await?;

        let mut entries = Vec::new();
        for name in names {
            match self
                .store
                .price_history(&name, self.config.analytics.trend_hours)
                .await
            {
                Ok(history) => entries.push((name, self.trend.analyze(&history))),
                Err(e) => warn!(item = %name, error = %e, "skipping item with unreadable history"),
            }
        }

        Ok(rank_trending(entries, direction, limit))
    }

    /// Ranked buy recommendations
    pub async fn recommendations(
        &self,
        limit: usize,
        min_confidence: Option<f64>,
    ) -> Vec<Recommendation> {
        self.predictor
            .recommendations(&self.store, limit, min_confidence)
            .await
    }

    /// Buy the top profit-ranked items within a budget
    pub async fn buy_top(&self, limit: usize, budget: Decimal) -> Result<PurchaseSummary> {
        let items = self
            .store
            .profitable_items(self.config.trading.min_volume, limit as i64)
            .await?;

        let candidates: Vec<BuyCandidate> = items
            .into_iter()
            .map(|i| BuyCandidate {
                name: i.name,
                lowest_price: i.lowest_price,
                expected_profit: i.expected_profit,
            })
            .collect();

        let plan = self.allocator.allocate(&candidates, limit, budget);
        info!(
            orders = plan.count(),
            total = %plan.total_spend,
            "allocated purchase plan"
        );

        self.execute_plan(plan).await
    }

    /// Buy recommendation-ranked items within a budget
    pub async fn buy_ml(
        &self,
        limit: usize,
        budget: Decimal,
        min_confidence: Option<f64>,
    ) -> Result<PurchaseSummary> {
        // Over-fetch so skipped candidates still leave enough to fill the limit
        let recommendations = self
            .predictor
            .recommendations(&self.store, limit * 2, min_confidence)
            .await;

        if recommendations.is_empty() {
            info!("no recommendations cleared the confidence bar");
            return Ok(PurchaseSummary::default());
        }

        for rec in &recommendations {
            info!(
                item = %rec.name,
                score = rec.score,
                confidence = rec.confidence,
                reasons = ?rec.reasons,
                "recommendation"
            );
        }

        let candidates: Vec<BuyCandidate> = recommendations
            .into_iter()
            .map(|r| BuyCandidate {
                name: r.name,
                lowest_price: r.price,
                expected_profit: r.expected_profit,
            })
            .collect();

        let plan = self.allocator.allocate(&candidates, limit, budget);
        self.execute_plan(plan).await
    }

    /// Evaluate the inventory and list items the risk rules release
    pub async fn auto_sell(&self) -> Result<SellSummary> {
        let inventory = self
            .client
            .inventory(self.game.app_id, self.game.context_id)
            .await?;
        let marketable: Vec<_> = inventory.into_iter().filter(|i| i.marketable).collect();

        if marketable.is_empty() {
            info!("no marketable items in inventory");
            return Ok(SellSummary::default());
        }
        info!(count = marketable.len(), "evaluating marketable inventory");

        let mut summary = SellSummary::default();
        for item in marketable {
            let name = item.market_hash_name.as_str();

            let overview = match self.client.price_overview(self.game.app_id, name).await {
                Ok(Some(overview)) => overview,
                Ok(None) => {
                    warn!(item = name, "no price data, skipping");
                    continue;
                }
                Err(e) => {
                    warn!(item = name, error = %e, "price fetch failed, skipping");
                    continue;
                }
            };
            let Some(median) = overview.median_price else {
                warn!(item = name, "no median price, skipping");
                continue;
            };

            let trend = match self
                .store
                .price_history(name, self.config.analytics.trend_hours)
                .await
            {
                Ok(history) => self.trend.analyze(&history),
                Err(e) => {
                    warn!(item = name, error = %e, "trend history unreadable");
                    TrendResult::error()
                }
            };

            let decision = match self.store.last_successful_buy(name).await {
                Ok(last_buy) => self.risk.evaluate(last_buy, median),
                Err(e) => RiskDecision::fail_open(e),
            };
            info!(item = name, reason = %decision.reason, "{}", decision.message);

            if !decision.should_sell {
                summary.held += 1;
                continue;
            }
            if decision.urgency == Urgency::Urgent {
                warn!(item = name, "{}: selling immediately", decision.reason);
            }

            let markup = self.pricing.markup(overview.volume, trend.trend, median);
            let price = self.pricing.sell_price(median, markup);
            info!(item = name, markup = %markup, price = %price, "listing for sale");

            match self
                .client
                .list_for_sale(self.game.app_id, self.game.context_id, &item.asset_id, price)
                .await
            {
                Ok(()) => {
                    self.log_transaction(
                        name,
                        TransactionKind::Sell,
                        price,
                        TransactionStatus::Success,
                        "Item listed for sale",
                    )
                    .await;
                    summary.listed += 1;
                    summary.revenue += price;
                }
                Err(e) => {
                    warn!(item = name, error = %e, "listing failed");
                    self.log_transaction(
                        name,
                        TransactionKind::Sell,
                        price,
                        TransactionStatus::Failed,
                        e.to_string(),
                    )
                    .await;
                }
            }
            self.pace().await;
        }

        info!(
            listed = summary.listed,
            revenue = %summary.revenue,
            held = summary.held,
            "auto-sell completed"
        );
        Ok(summary)
    }

    /// Write currently profitable items to a CSV file
    pub async fn export_csv(&self, path: &str) -> Result<usize> {
        let items = self
            .store
            .profitable_items(self.config.trading.min_volume, 1000)
            .await?;

        let mut out = String::from("name,lowest_price,median_price,volume,expected_profit\n");
        for item in &items {
            // Item names can contain commas
            out.push_str(&format!(
                "\"{}\",{},{},{},{}\n",
                item.name.replace('"', "\"\""),
                item.lowest_price,
                item.median_price,
                item.volume,
                item.expected_profit
            ));
        }
        tokio::fs::write(path, out).await?;

        info!(count = items.len(), path, "exported profitable items");
        Ok(items.len())
    }

    async fn execute_plan(&self, plan: PurchasePlan) -> Result<PurchaseSummary> {
        let mut summary = PurchaseSummary::default();

        for order in plan.orders {
            match self
                .client
                .place_buy_order(self.game.app_id, &order.name, order.price)
                .await
            {
                Ok(()) => {
                    info!(item = %order.name, price = %order.price, "buy order placed");
                    self.log_transaction(
                        &order.name,
                        TransactionKind::Buy,
                        order.price,
                        TransactionStatus::Success,
                        "Order placed successfully",
                    )
                    .await;
                    summary.orders_placed += 1;
                    summary.total_spent += order.price;
                    summary.purchased.push(order);
                }
                Err(e) => {
                    warn!(item = %order.name, error = %e, "buy order failed, continuing");
                    self.log_transaction(
                        &order.name,
                        TransactionKind::Buy,
                        order.price,
                        TransactionStatus::Failed,
                        e.to_string(),
                    )
                    .await;
                }
            }
            self.pace().await;
        }

        info!(
            placed = summary.orders_placed,
            spent = %summary.total_spent,
            "buy pass completed"
        );
        Ok(summary)
    }

    async fn log_transaction(
        &self,
        item_name: &str,
        kind: TransactionKind,
        price: Decimal,
        status: TransactionStatus,
        details: impl Into<String>,
    ) {
        let record = TransactionRecord::new(
            item_name,
            self.game.app_id,
            self.game.key,
            kind,
            price,
            status,
            details,
        );
        if let Err(e) = self.store.record_transaction(&record).await {
            warn!(item = item_name, error = %e, "failed to record transaction");
        }
    }

    /// Randomized delay between remote calls
    async fn pace(&self) {
        let base = self.config.api.request_delay_ms;
        let jitter = self.config.api.request_delay_jitter_ms;
        let extra = if jitter > 0 {
            rand::rng().random_range(0..jitter)
        } else {
            0
        };
        tokio::time::sleep(Duration::from_millis(base + extra)).await;
    }
}
