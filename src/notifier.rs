// =============================================================================
// Discord Notifier — webhook delivery and alert formatting
// =============================================================================
//
// Messages are posted as `{"content": "..."}`. When no webhook is configured
// the message is logged instead and delivery reports `Skipped`, so local runs
// and tests never need a Discord channel.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument};

use crate::types::TickerSnapshot;

/// Timeout for a single webhook POST.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Serialize)]
struct DiscordPayload<'a> {
    content: &'a str,
}

/// Outcome of a delivery attempt that did not error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delivery {
    Sent,
    Skipped,
}

#[derive(Clone)]
pub struct Notifier {
    webhook_url: Option<String>,
    http: reqwest::Client,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .context("failed to build webhook HTTP client")?;
        Ok(Self { webhook_url, http })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }

    #[instrument(skip(self, content), name = "notifier::send")]
    pub async fn send(&self, content: &str) -> Result<Delivery> {
        let Some(url) = self.webhook_url.as_deref() else {
            info!(message = %content, "no webhook configured, alert logged only");
            return Ok(Delivery::Skipped);
        };

        let resp = self
            .http
            .post(url)
            .json(&DiscordPayload { content })
            .send()
            .await
            .context("discord webhook request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("discord webhook returned {status}");
        }

        Ok(Delivery::Sent)
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// =============================================================================
// Message formatting
// =============================================================================

/// `**SYM Momentum Alert** 🚀` followed by price, 24h change and volume.
pub fn momentum_alert(symbol: &str, snap: &TickerSnapshot) -> String {
    format!(
        "**{symbol} Momentum Alert** 🚀\nPrice: {} | 24h Δ {:.2}% | Vol: {}",
        snap.last_price,
        snap.price_change_percent,
        group_thousands(snap.quote_volume)
    )
}

/// Scan summary wrapped in a code block.
pub fn scan_summary(lines: &[String]) -> String {
    format!("**Pingr Scan Completed ✅**\n```\n{}\n```", lines.join("\n"))
}

/// Round to an integer and insert `,` every three digits.
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}
