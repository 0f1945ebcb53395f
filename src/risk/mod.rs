//! Sell-decision risk management
//!
//! Each evaluation is a fresh pass through a fixed ladder of rules; no
//! state survives between calls. Stop-loss and take-profit run before the
//! flat minimum-profit rule so a large swing is classified by magnitude
//! first.

use crate::config::RiskConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Why an item should (or should not) be sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellReason {
    StopLoss,
    TakeProfit,
    /// Minimum absolute profit reached
    Profit,
    Holding,
    NoPurchaseHistory,
    /// Purchase history could not be read; fail open
    Error,
}

impl std::fmt::Display for SellReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SellReason::StopLoss => "stop_loss",
            SellReason::TakeProfit => "take_profit",
            SellReason::Profit => "profit",
            SellReason::Holding => "holding",
            SellReason::NoPurchaseHistory => "no_purchase_history",
            SellReason::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    High,
    Normal,
    Low,
}

/// Outcome of one risk evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct RiskDecision {
    pub should_sell: bool,
    pub reason: SellReason,
    pub urgency: Urgency,
    pub message: String,
}

impl RiskDecision {
    /// Decision taken when purchase history cannot be read: sell rather
    /// than hold indefinitely on unknown cost basis.
    pub fn fail_open(context: impl std::fmt::Display) -> Self {
        Self {
            should_sell: true,
            reason: SellReason::Error,
            urgency: Urgency::Normal,
            message: format!("Purchase history unavailable: {context}"),
        }
    }
}

/// Evaluates whether a held item should be sold
#[derive(Debug, Clone)]
pub struct RiskManager {
    config: RiskConfig,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Decide whether to sell given the most recent successful purchase
    /// price (if any) and the current market price.
    ///
    /// Rules, checked strictly in order: no history, stop-loss (strict),
    /// take-profit (strict), minimum absolute profit (inclusive), hold.
    pub fn evaluate(&self, last_buy: Option<Decimal>, current_price: Decimal) -> RiskDecision {
        let Some(buy_price) = last_buy else {
            return RiskDecision {
                should_sell: true,
                reason: SellReason::NoPurchaseHistory,
                urgency: Urgency::Normal,
                message: "No purchase history, selling opportunistically".to_string(),
            };
        };

        // A non-positive recorded cost basis cannot be evaluated against
        // percentage thresholds; treat it like unreadable history.
        if buy_price <= Decimal::ZERO {
            return RiskDecision::fail_open(format!("non-positive buy price {buy_price}"));
        }

        let profit = current_price - buy_price;
        let profit_percent = profit / buy_price * dec!(100);

        if profit_percent < -self.config.stop_loss_percent {
            return RiskDecision {
                should_sell: true,
                reason: SellReason::StopLoss,
                urgency: Urgency::Urgent,
                message: format!("Stop-loss triggered: {:.1}% loss", profit_percent),
            };
        }

        if profit_percent > self.config.take_profit_percent {
            return RiskDecision {
                should_sell: true,
                reason: SellReason::TakeProfit,
                urgency: Urgency::High,
                message: format!("Take-profit triggered: {:.1}% profit", profit_percent),
            };
        }

        if profit >= self.config.min_profit_to_sell {
            return RiskDecision {
                should_sell: true,
                reason: SellReason::Profit,
                urgency: Urgency::Normal,
                message: format!("Profitable: +{:.2}", profit),
            };
        }

        RiskDecision {
            should_sell: false,
            reason: SellReason::Holding,
            urgency: Urgency::Low,
            message: format!(
                "Holding: {:.1}% (bought at {:.2})",
                profit_percent, buy_price
            ),
        }
    }
}
