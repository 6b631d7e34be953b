// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Holds only the injected collaborators. Scans keep no cross-request state;
// the one mutable piece is the atomic scan counter reported by /api/health.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::binance::BinanceClient;
use crate::notifier::Notifier;
use crate::runtime_config::ConfigLoader;
use crate::scanner::Scanner;
use crate::settings::Settings;

#[derive(Debug)]
pub struct AppState {
    pub scanner: Scanner,
    pub started_at: DateTime<Utc>,
    scans_run: AtomicU64,
}

impl AppState {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            started_at: Utc::now(),
            scans_run: AtomicU64::new(0),
        }
    }

    /// Wire up the collaborators described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let client = BinanceClient::new(&settings.binance_base_url, settings.proxies.clone())?;
        let notifier = Notifier::new(settings.discord_webhook_url.clone())?;
        let loader = ConfigLoader::new(
            settings.config_url.clone(),
            settings.config_path.clone(),
            settings.github_token.clone(),
        )?;
        Ok(Self::new(Scanner::new(client, notifier, loader)))
    }

    pub fn record_scan(&self) -> u64 {
        self.scans_run.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn scans_run(&self) -> u64 {
        self.scans_run.load(Ordering::Relaxed)
    }
}
