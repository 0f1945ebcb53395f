//! Steam Community Market client

use super::{parse_price, parse_volume, MarketClient, PriceOverview};
use crate::config::ApiConfig;
use crate::error::{BotError, Result};
use crate::types::InventoryItem;
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// HTTP client for the Steam Community Market.
///
/// Authentication is not handled here: a pre-established session cookie is
/// supplied through configuration (or [`set_session_cookie`] after a
/// refresh) and attached to every request.
///
/// [`set_session_cookie`]: SteamMarketClient::set_session_cookie
pub struct SteamMarketClient {
    http: reqwest::Client,
    base_url: String,
    currency: u32,
    country: String,
    steam_id: String,
    session: RwLock<String>,
}

#[derive(Debug, Deserialize)]
struct RawPriceOverview {
    #[serde(default)]
    success: bool,
    lowest_price: Option<String>,
    median_price: Option<String>,
    volume: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BuyOrderAck {
    success: i32,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SellAck {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInventory {
    #[serde(default)]
    assets: Vec<RawAsset>,
    #[serde(default)]
    descriptions: Vec<RawDescription>,
    #[serde(default)]
    success: i32,
}

#[derive(Debug, Deserialize)]
struct RawAsset {
    assetid: String,
    classid: String,
    instanceid: String,
}

#[derive(Debug, Deserialize)]
struct RawDescription {
    classid: String,
    instanceid: String,
    market_hash_name: String,
    #[serde(default)]
    marketable: i32,
}

impl SteamMarketClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency,
            country: config.country.clone(),
            steam_id: config.steam_id.clone(),
            session: RwLock::new(config.session_cookie.clone()),
        })
    }

    /// Replace the session cookie after an external refresh
    pub fn set_session_cookie(&self, cookie: impl Into<String>) {
        *self.session.write() = cookie.into();
    }

    fn cookie(&self) -> String {
        self.session.read().clone()
    }

    /// The `sessionid` value embedded in the cookie header, required as a
    /// form field by the order endpoints.
    fn session_id(&self) -> Result<String> {
        self.cookie()
            .split(';')
            .map(str::trim)
            .find_map(|kv| kv.strip_prefix("sessionid="))
            .map(str::to_string)
            .ok_or_else(|| BotError::Market("no sessionid in session cookie".to_string()))
    }

    /// Steam prices go over the wire in integer cents
    fn to_cents(price: Decimal) -> i64 {
        (price * dec!(100)).round().to_i64().unwrap_or(0)
    }
}

#[async_trait]
impl MarketClient for SteamMarketClient {
    async fn price_overview(
        &self,
        app_id: u32,
        item_name: &str,
    ) -> Result<Option<PriceOverview>> {
        let url = format!("{}/market/priceoverview/", self.base_url);
        let raw: RawPriceOverview = self
            .http
            .get(&url)
            .query(&[
                ("appid", app_id.to_string()),
                ("currency", self.currency.to_string()),
                ("country", self.country.clone()),
                ("market_hash_name", item_name.to_string()),
            ])
            .header(header::COOKIE, self.cookie())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !raw.success {
            debug!(item = item_name, "no price data returned");
            return Ok(None);
        }

        Ok(Some(PriceOverview {
            lowest_price: raw.lowest_price.as_deref().and_then(parse_price),
            median_price: raw.median_price.as_deref().and_then(parse_price),
            volume: raw.volume.as_deref().map(parse_volume).unwrap_or(0),
        }))
    }

    async fn place_buy_order(&self, app_id: u32, item_name: &str, price: Decimal) -> Result<()> {
        let session_id = self.session_id()?;
        let url = format!("{}/market/createbuyorder/", self.base_url);
        let referer = format!("{}/market/listings/{}/{}", self.base_url, app_id, item_name);

        let ack: BuyOrderAck = self
            .http
            .post(&url)
            .header(header::COOKIE, self.cookie())
            .header(header::REFERER, referer)
            .form(&[
                ("sessionid", session_id),
                ("currency", self.currency.to_string()),
                ("appid", app_id.to_string()),
                ("market_hash_name", item_name.to_string()),
                ("price_total", Self::to_cents(price).to_string()),
                ("quantity", "1".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if ack.success != 1 {
            return Err(BotError::Market(ack.message.unwrap_or_else(|| {
                format!("buy order rejected with code {}", ack.success)
            })));
        }

        Ok(())
    }

    async fn list_for_sale(
        &self,
        app_id: u32,
        context_id: u32,
        asset_id: &str,
        price: Decimal,
    ) -> Result<()> {
        let session_id = self.session_id()?;
        let url = format!("{}/market/sellitem/", self.base_url);

        let ack: SellAck = self
            .http
            .post(&url)
            .header(header::COOKIE, self.cookie())
            .header(header::REFERER, format!("{}/my/inventory/", self.base_url))
            .form(&[
                ("sessionid", session_id),
                ("appid", app_id.to_string()),
                ("contextid", context_id.to_string()),
                ("assetid", asset_id.to_string()),
                ("amount", "1".to_string()),
                ("price", Self::to_cents(price).to_string()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !ack.success {
            return Err(BotError::Market(
                ack.message
                    .unwrap_or_else(|| "sale listing rejected".to_string()),
            ));
        }

        Ok(())
    }

    async fn inventory(&self, app_id: u32, context_id: u32) -> Result<Vec<InventoryItem>> {
        let url = format!(
            "{}/inventory/{}/{}/{}",
            self.base_url, self.steam_id, app_id, context_id
        );

        let raw: RawInventory = self
            .http
            .get(&url)
            .query(&[("l", "english".to_string()), ("count", "2000".to_string())])
            .header(header::COOKIE, self.cookie())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if raw.success != 1 {
            return Err(BotError::Market("inventory fetch rejected".to_string()));
        }

        // Asset rows carry ids only; names and flags live in descriptions
        let descriptions: HashMap<(&str, &str), &RawDescription> = raw
            .descriptions
            .iter()
            .map(|d| ((d.classid.as_str(), d.instanceid.as_str()), d))
            .collect();

        Ok(raw
            .assets
            .iter()
            .filter_map(|asset| {
                descriptions
                    .get(&(asset.classid.as_str(), asset.instanceid.as_str()))
                    .map(|d| InventoryItem {
                        asset_id: asset.assetid.clone(),
                        market_hash_name: d.market_hash_name.clone(),
                        marketable: d.marketable == 1,
                    })
            })
            .collect())
    }
}
