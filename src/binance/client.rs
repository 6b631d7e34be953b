// =============================================================================
// Binance USDⓈ-M Futures REST client — public market data with proxy fallback
// =============================================================================
//
// Only unsigned endpoints are used, so no API key is held. Some hosting
// regions receive HTTP 451 from Binance; every request therefore walks a
// configurable list of proxy prefixes before trying the direct URL.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use super::rate_limit::RateLimitTracker;
use crate::types::{PriceSeries, TickerSnapshot};

/// Default futures REST base URL.
pub const BINANCE_FUTURES_BASE: &str = "https://fapi.binance.com";

/// Per-request timeout for every route in the fallback chain.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Index of the close price inside a kline array.
const KLINE_CLOSE_INDEX: usize = 4;

#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    proxies: Vec<String>,
    client: reqwest::Client,
    rate_limit: Arc<RateLimitTracker>,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a client for `base_url`.
    ///
    /// # Arguments
    /// * `base_url` — e.g. [`BINANCE_FUTURES_BASE`]; a trailing `/` is trimmed.
    /// * `proxies`  — prefixes prepended to the full Binance URL, tried in
    ///   order before the direct request.
    pub fn new(base_url: impl Into<String>, proxies: Vec<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, proxies = proxies.len(), "BinanceClient initialised");

        Ok(Self {
            base_url,
            proxies,
            client,
            rate_limit: Arc::new(RateLimitTracker::new()),
        })
    }

    /// Replace the weight tracker, e.g. one with a shorter window.
    pub fn with_rate_limit(mut self, tracker: RateLimitTracker) -> Self {
        self.rate_limit = Arc::new(tracker);
        self
    }

    pub fn rate_limit(&self) -> &Arc<RateLimitTracker> {
        &self.rate_limit
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /fapi/v1/ticker/24hr for a single symbol. Absent numeric fields
    /// read as 0, so a thin response surfaces as low volume rather than a
    /// fetch failure; a present but unparseable field is still an error.
    #[instrument(skip(self), name = "binance::get_ticker_24h")]
    pub async fn get_ticker_24h(&self, symbol: &str) -> Result<TickerSnapshot> {
        let endpoint = format!("/fapi/v1/ticker/24hr?symbol={symbol}");
        let body = self.get_json(&endpoint, 1).await?;

        let snapshot = TickerSnapshot {
            last_price: Self::ticker_field(&body, "lastPrice")?,
            quote_volume: Self::ticker_field(&body, "quoteVolume")?,
            price_change_percent: Self::ticker_field(&body, "priceChangePercent")?,
        };

        debug!(symbol, ?snapshot, "24h ticker fetched");
        Ok(snapshot)
    }

    /// GET /fapi/v1/klines and return the close prices, oldest first.
    ///
    /// Array indices:
    ///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume, ...
    #[instrument(skip(self), name = "binance::get_closes")]
    pub async fn get_closes(&self, symbol: &str, interval: &str, limit: u32) -> Result<PriceSeries> {
        let endpoint = format!("/fapi/v1/klines?symbol={symbol}&interval={interval}&limit={limit}");
        let body = self.get_json(&endpoint, klines_weight(limit)).await?;

        let raw = body.as_array().context("klines response is not an array")?;

        let mut closes = Vec::with_capacity(raw.len());
        for entry in raw {
            let arr = entry.as_array().context("kline entry is not an array")?;
            let Some(close) = arr.get(KLINE_CLOSE_INDEX) else {
                warn!("skipping malformed kline entry with {} elements", arr.len());
                continue;
            };
            closes.push(Self::parse_str_f64(close)?);
        }

        debug!(symbol, interval, count = closes.len(), "klines fetched");
        Ok(closes)
    }

    // -------------------------------------------------------------------------
    // Transport
    // -------------------------------------------------------------------------

    /// Route list for `endpoint`: each proxy prefix, then direct.
    fn routes(&self, endpoint: &str) -> Vec<String> {
        let target = format!("{}{}", self.base_url, endpoint);
        self.proxies
            .iter()
            .map(|p| format!("{p}{target}"))
            .chain(std::iter::once(target.clone()))
            .collect()
    }

    /// GET `endpoint` through the fallback chain and decode the JSON body.
    ///
    /// A 451 moves straight to the next route; any other failure is logged and
    /// the next route tried. Fails only once every route has failed.
    async fn get_json(&self, endpoint: &str, weight: u32) -> Result<serde_json::Value> {
        if !self.rate_limit.can_send_request(weight) {
            anyhow::bail!("request weight budget exhausted for {endpoint}");
        }

        let mut last_err = None;
        for url in self.routes(endpoint) {
            match self.try_route(&url).await {
                Ok(Some(body)) => return Ok(body),
                Ok(None) => debug!(url = %url, "route returned 451, trying next"),
                Err(e) => {
                    warn!(url = %url, error = %e, "route failed");
                    last_err = Some(e);
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| anyhow!("every route returned 451"))
            .context(format!("all routes failed for {endpoint}")))
    }

    /// `Ok(None)` signals HTTP 451.
    async fn try_route(&self, url: &str) -> Result<Option<serde_json::Value>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url} request failed"))?;

        self.rate_limit.update_from_headers(resp.headers());

        let status = resp.status();
        if status == StatusCode::UNAVAILABLE_FOR_LEGAL_REASONS {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("GET {url} returned {status}");
        }

        let body = resp
            .json()
            .await
            .with_context(|| format!("failed to parse response from {url}"))?;
        Ok(Some(body))
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn ticker_field(body: &serde_json::Value, key: &str) -> Result<f64> {
        match body.get(key) {
            None | Some(serde_json::Value::Null) => Ok(0.0),
            Some(val) => Self::parse_str_f64(val).with_context(|| key.to_string()),
        }
    }

    /// Parse a JSON value that may be either a string or a number into `f64`.
    fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
        if let Some(s) = val.as_str() {
            s.parse::<f64>()
                .with_context(|| format!("failed to parse '{s}' as f64"))
        } else if let Some(n) = val.as_f64() {
            Ok(n)
        } else {
            anyhow::bail!("expected string or number, got: {val}")
        }
    }
}

/// Request weight of GET /fapi/v1/klines for a given `limit`.
fn klines_weight(limit: u32) -> u32 {
    match limit {
        0..=99 => 1,
        100..=499 => 2,
        500..=1000 => 5,
        _ => 10,
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .field("proxies", &self.proxies)
            .finish()
    }
}
