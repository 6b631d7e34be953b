// =============================================================================
// Scanner — one entry point for the full (MACD) and light (momentum) scans
// =============================================================================
//
// Per scan: load config → for each pair fetch ticker → decide → alert.
// Pairs are processed sequentially; a failure on one pair becomes a row in
// the report and never aborts the scan.
// =============================================================================

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::binance::BinanceClient;
use crate::notifier::{group_thousands, momentum_alert, scan_summary, Delivery, Notifier};
use crate::runtime_config::{ConfigLoader, ScanConfig};
use crate::signals::{EngineParams, SignalEngine};
use crate::types::{ScanMode, Signal, SignalVerdict, TickerSnapshot};

// =============================================================================
// Report types
// =============================================================================

/// One line of a scan report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRow {
    pub symbol: String,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pct_change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_vol: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strong_move: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanRow {
    fn failed(symbol: &str, error: &anyhow::Error) -> Self {
        Self {
            symbol: symbol.to_string(),
            signal: Signal::FetchFailed,
            price: None,
            pct_change: None,
            quote_vol: None,
            strong_move: None,
            rsi: None,
            error: Some(format!("{error:#}")),
        }
    }

    fn from_verdict(verdict: &SignalVerdict) -> Self {
        let snap = verdict.snapshot;
        Self {
            symbol: verdict.symbol.clone(),
            signal: verdict.signal,
            price: snap.map(|s| s.last_price),
            pct_change: snap.map(|s| s.price_change_percent),
            quote_vol: snap.map(|s| s.quote_volume),
            strong_move: None,
            rsi: verdict.indicators.as_ref().and_then(|i| i.latest_rsi()),
            error: None,
        }
    }

    /// Plain-text line used in the Discord scan summary.
    pub fn summary_line(&self) -> String {
        match self.signal {
            Signal::FetchFailed => format!("{}: ❌ Failed to fetch data", self.symbol),
            Signal::LowVolume => format!(
                "{}: skipped (low volume {})",
                self.symbol,
                group_thousands(self.quote_vol.unwrap_or_default())
            ),
            signal => format!("{}: ✅ {}", self.symbol, signal),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub status: String,
    pub mode: ScanMode,
    pub timestamp: DateTime<Utc>,
    pub pairs_checked: usize,
    pub alerts_sent: usize,
    pub results: Vec<ScanRow>,
}

impl ScanReport {
    fn new(mode: ScanMode, results: Vec<ScanRow>, alerts_sent: usize) -> Self {
        let status = match mode {
            ScanMode::Full => "Pingr Scan Complete",
            ScanMode::Light => "Pingr Light Scan Complete",
        };
        Self {
            status: status.to_string(),
            mode,
            timestamp: Utc::now(),
            pairs_checked: results.len(),
            alerts_sent,
            results,
        }
    }
}

// =============================================================================
// Scanner
// =============================================================================

#[derive(Debug, Clone)]
pub struct Scanner {
    client: BinanceClient,
    notifier: Notifier,
    loader: ConfigLoader,
}

impl Scanner {
    pub fn new(client: BinanceClient, notifier: Notifier, loader: ConfigLoader) -> Self {
        Self {
            client,
            notifier,
            loader,
        }
    }

    pub fn client(&self) -> &BinanceClient {
        &self.client
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Load config and run `mode`.
    ///
    /// A full scan falls back to default config when loading fails; a light
    /// scan returns the load error to the caller.
    pub async fn run(&self, mode: ScanMode) -> Result<ScanReport> {
        let config = match (self.loader.load().await, mode) {
            (Ok(cfg), _) => cfg,
            (Err(e), ScanMode::Full) => {
                warn!(error = %e, "could not load scan config, using defaults");
                ScanConfig::default()
            }
            (Err(e), ScanMode::Light) => return Err(e),
        };

        Ok(self.run_with(mode, &config).await)
    }

    pub async fn run_with(&self, mode: ScanMode, config: &ScanConfig) -> ScanReport {
        info!(%mode, pairs = ?config.pairs_to_scan(), "running scan");
        match mode {
            ScanMode::Full => self.scan_full(config).await,
            ScanMode::Light => self.scan_light(config).await,
        }
    }

    /// Volume gate, then MACD cross on recent klines. Sends one summary.
    pub async fn scan_full(&self, config: &ScanConfig) -> ScanReport {
        let engine = SignalEngine::new(EngineParams::from(config));
        let mut rows = Vec::new();

        for symbol in config.pairs_to_scan() {
            let snap = match self.client.get_ticker_24h(symbol).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "ticker fetch failed");
                    rows.push(ScanRow::failed(symbol, &e));
                    continue;
                }
            };

            if snap.quote_volume < config.min_24h_volume_usdt {
                let verdict = SignalVerdict::new(symbol.as_str(), Signal::LowVolume).with_snapshot(snap);
                rows.push(ScanRow::from_verdict(&verdict));
                continue;
            }

            let verdict = match self
                .client
                .get_closes(symbol, &config.kline_interval, config.kline_limit)
                .await
            {
                Ok(closes) => engine.evaluate_macd(symbol, &closes).with_snapshot(snap),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "kline fetch failed, treating as no signal");
                    SignalVerdict::new(symbol.as_str(), Signal::NoSignal).with_snapshot(snap)
                }
            };
            info!(symbol = %symbol, signal = %verdict.signal, "full scan verdict");
            rows.push(ScanRow::from_verdict(&verdict));
        }

        let lines: Vec<String> = rows.iter().map(ScanRow::summary_line).collect();
        let sent = self.deliver(&scan_summary(&lines)).await;

        ScanReport::new(ScanMode::Full, rows, sent)
    }

    /// 24h momentum filter. Sends one alert per strong move.
    pub async fn scan_light(&self, config: &ScanConfig) -> ScanReport {
        let engine = SignalEngine::new(EngineParams::from(config));
        let mut rows = Vec::new();
        let mut sent = 0;

        for symbol in config.pairs_to_scan() {
            let snap: TickerSnapshot = match self.client.get_ticker_24h(symbol).await {
                Ok(s) => s,
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "ticker fetch failed");
                    rows.push(ScanRow::failed(symbol, &e));
                    continue;
                }
            };

            let verdict = engine.evaluate_momentum(symbol, snap);
            let strong = verdict.fired();
            if strong {
                info!(symbol = %symbol, pct = snap.price_change_percent, "momentum alert");
                sent += self.deliver(&momentum_alert(symbol, &snap)).await;
            }

            let mut row = ScanRow::from_verdict(&verdict);
            row.strong_move = Some(strong);
            rows.push(row);
        }

        ScanReport::new(ScanMode::Light, rows, sent)
    }

    /// Send `content`; returns 1 if delivered, 0 otherwise.
    async fn deliver(&self, content: &str) -> usize {
        match self.notifier.send(content).await {
            Ok(Delivery::Sent) => 1,
            Ok(Delivery::Skipped) => 0,
            Err(e) => {
                warn!(error = %e, "alert delivery failed");
                0
            }
        }
    }
}
