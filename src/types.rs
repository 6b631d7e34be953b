// =============================================================================
// Shared types used across the Pingr scanner
// =============================================================================

use serde::{Deserialize, Serialize};

/// Chronological closing prices for one symbol (oldest first).
pub type PriceSeries = Vec<f64>;

/// 24-hour ticker snapshot for a single futures symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickerSnapshot {
    pub last_price: f64,
    pub quote_volume: f64,
    pub price_change_percent: f64,
}

/// Indicator values derived from a [`PriceSeries`]. Every sequence is aligned
/// to the tail of the input, so `last()` is always the most recent sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorResult {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd: Vec<f64>,
    pub macd_signal: Vec<f64>,
}

impl IndicatorResult {
    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied()
    }

    pub fn latest_macd(&self) -> Option<(f64, f64)> {
        Some((*self.macd.last()?, *self.macd_signal.last()?))
    }
}

/// Categorical outcome of evaluating one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    MacdBullishCross,
    MomentumSpike,
    NoSignal,
    LowVolume,
    FetchFailed,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MacdBullishCross => write!(f, "MACD Bullish"),
            Self::MomentumSpike => write!(f, "Momentum Spike"),
            Self::NoSignal => write!(f, "No signal"),
            Self::LowVolume => write!(f, "Low volume"),
            Self::FetchFailed => write!(f, "Fetch failed"),
        }
    }
}

/// Verdict for one symbol plus the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalVerdict {
    pub symbol: String,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<TickerSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<IndicatorResult>,
}

impl SignalVerdict {
    pub fn new(symbol: impl Into<String>, signal: Signal) -> Self {
        Self {
            symbol: symbol.into(),
            signal,
            snapshot: None,
            indicators: None,
        }
    }

    pub fn with_snapshot(mut self, snapshot: TickerSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorResult) -> Self {
        self.indicators = Some(indicators);
        self
    }

    pub fn fired(&self) -> bool {
        matches!(self.signal, Signal::MacdBullishCross | Signal::MomentumSpike)
    }
}

/// Which scan flavour to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Volume gate followed by a MACD cross check on 15m klines.
    #[default]
    Full,
    /// 24h momentum/volume filter only.
    Light,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Light => write!(f, "light"),
        }
    }
}

impl std::str::FromStr for ScanMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "light" => Ok(Self::Light),
            other => anyhow::bail!("unknown scan mode '{other}' (expected 'full' or 'light')"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_mode_parses_case_insensitively() {
        assert_eq!("Light".parse::<ScanMode>().unwrap(), ScanMode::Light);
        assert_eq!(" full ".parse::<ScanMode>().unwrap(), ScanMode::Full);
        assert!("turbo".parse::<ScanMode>().is_err());
    }

    #[test]
    fn scan_mode_defaults_to_full() {
        assert_eq!(ScanMode::default(), ScanMode::Full);
        let mode: ScanMode = serde_json::from_str(r#""light""#).unwrap();
        assert_eq!(mode, ScanMode::Light);
    }

    #[test]
    fn verdict_fired_only_for_alerting_signals() {
        assert!(SignalVerdict::new("BTCUSDT", Signal::MacdBullishCross).fired());
        assert!(SignalVerdict::new("BTCUSDT", Signal::MomentumSpike).fired());
        assert!(!SignalVerdict::new("BTCUSDT", Signal::NoSignal).fired());
        assert!(!SignalVerdict::new("BTCUSDT", Signal::LowVolume).fired());
    }

    #[test]
    fn latest_macd_requires_both_lines() {
        let mut r = IndicatorResult::default();
        r.macd = vec![1.0];
        assert!(r.latest_macd().is_none());
        r.macd_signal = vec![0.5];
        assert_eq!(r.latest_macd(), Some((1.0, 0.5)));
    }
}
