// =============================================================================
// Scan Configuration — watched pairs and alert thresholds
// =============================================================================
//
// The scan config is a JSON document, normally hosted as a raw file on GitHub
// and fetched at the start of every scan. A local file path may be used
// instead. All fields carry `#[serde(default)]` so a partial document (or an
// empty `{}`) still deserialises.
// =============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::indicators::DEFAULT_RSI_PERIOD;
use crate::signals::MomentumThresholds;

/// Timeout for the remote config request.
const CONFIG_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_favorite_pairs() -> Vec<String> {
    vec![
        "BTCUSDT".to_string(),
        "ETHUSDT".to_string(),
        "SOLUSDT".to_string(),
    ]
}

fn default_min_24h_volume_usdt() -> f64 {
    40_000_000.0
}

fn default_heat_index_threshold() -> f64 {
    50.0
}

fn default_volume_spike_threshold() -> f64 {
    4.0
}

fn default_momentum_pct_threshold() -> f64 {
    2.0
}

fn default_momentum_volume_threshold() -> f64 {
    40_000_000.0
}

fn default_max_pairs_per_scan() -> usize {
    5
}

fn default_kline_interval() -> String {
    "15m".to_string()
}

fn default_kline_limit() -> u32 {
    200
}

fn default_rsi_period() -> usize {
    DEFAULT_RSI_PERIOD
}

// =============================================================================
// ScanConfig
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Symbols to scan, in priority order.
    #[serde(default = "default_favorite_pairs")]
    pub favorite_pairs: Vec<String>,

    /// Full scan skips symbols whose 24h quote volume is below this.
    #[serde(default = "default_min_24h_volume_usdt")]
    pub min_24h_volume_usdt: f64,

    /// Accepted for config-file compatibility; not used in decisions.
    #[serde(default = "default_heat_index_threshold")]
    pub heat_index_threshold: f64,

    /// Accepted for config-file compatibility; not used in decisions.
    #[serde(default = "default_volume_spike_threshold")]
    pub volume_spike_threshold: f64,

    /// Light scan: absolute 24h percent change that must be exceeded.
    #[serde(default = "default_momentum_pct_threshold")]
    pub momentum_pct_threshold: f64,

    /// Light scan: 24h quote volume that must be exceeded.
    #[serde(default = "default_momentum_volume_threshold")]
    pub momentum_volume_threshold: f64,

    /// Only the first N favourite pairs are scanned per run.
    #[serde(default = "default_max_pairs_per_scan")]
    pub max_pairs_per_scan: usize,

    #[serde(default = "default_kline_interval")]
    pub kline_interval: String,

    #[serde(default = "default_kline_limit")]
    pub kline_limit: u32,

    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            favorite_pairs: default_favorite_pairs(),
            min_24h_volume_usdt: default_min_24h_volume_usdt(),
            heat_index_threshold: default_heat_index_threshold(),
            volume_spike_threshold: default_volume_spike_threshold(),
            momentum_pct_threshold: default_momentum_pct_threshold(),
            momentum_volume_threshold: default_momentum_volume_threshold(),
            max_pairs_per_scan: default_max_pairs_per_scan(),
            kline_interval: default_kline_interval(),
            kline_limit: default_kline_limit(),
            rsi_period: default_rsi_period(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a local JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scan config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse scan config from {}", path.display()))?;

        info!(path = %path.display(), pairs = ?config.favorite_pairs, "scan config loaded");
        Ok(config)
    }

    /// The pairs a single scan will visit.
    pub fn pairs_to_scan(&self) -> &[String] {
        let n = self.favorite_pairs.len().min(self.max_pairs_per_scan);
        &self.favorite_pairs[..n]
    }

    pub fn momentum_thresholds(&self) -> MomentumThresholds {
        MomentumThresholds {
            pct_change: self.momentum_pct_threshold,
            quote_volume: self.momentum_volume_threshold,
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Where the scan config comes from. Re-read on every scan, never cached.
#[derive(Clone)]
pub struct ConfigLoader {
    url: Option<String>,
    path: Option<PathBuf>,
    token: Option<String>,
    client: reqwest::Client,
}

impl ConfigLoader {
    /// Remote URL wins over a local path; with neither, defaults are used.
    pub fn new(url: Option<String>, path: Option<PathBuf>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(CONFIG_TIMEOUT)
            .build()
            .context("failed to build config HTTP client")?;

        Ok(Self {
            url,
            path,
            token,
            client,
        })
    }

    pub async fn load(&self) -> Result<ScanConfig> {
        if let Some(url) = &self.url {
            return self.fetch(url).await;
        }
        if let Some(path) = &self.path {
            return ScanConfig::load(path);
        }
        debug!("no config source configured, using defaults");
        Ok(ScanConfig::default())
    }

    /// GET the config JSON, authenticating with `Authorization: token <t>`
    /// when a token is present.
    #[instrument(skip(self), name = "config::fetch")]
    async fn fetch(&self, url: &str) -> Result<ScanConfig> {
        let mut req = self.client.get(url);
        if let Some(token) = &self.token {
            req = req.header(reqwest::header::AUTHORIZATION, format!("token {token}"));
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("GET {url} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("config fetch returned {status}");
        }

        let config: ScanConfig = resp
            .json()
            .await
            .context("failed to parse remote scan config")?;

        info!(pairs = ?config.favorite_pairs, "remote scan config loaded");
        Ok(config)
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("url", &self.url)
            .field("path", &self.path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
