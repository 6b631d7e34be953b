// =============================================================================
// Indicator & Signal Engine
// =============================================================================
//
// Pure transformation from (closes, ticker snapshot) to a `SignalVerdict`.
// The engine holds only immutable parameters; it performs no I/O and can be
// shared freely across symbols.
// =============================================================================

use crate::indicators::macd::{calculate_macd, is_bullish_cross, MACD_FAST, MACD_SLOW};
use crate::indicators::{calculate_ema, calculate_rsi};
use crate::runtime_config::ScanConfig;
use crate::signals::momentum::{is_strong_move, MomentumThresholds};
use crate::types::{IndicatorResult, Signal, SignalVerdict, TickerSnapshot};

/// Parameters the engine needs from the scan config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    pub rsi_period: usize,
    pub momentum: MomentumThresholds,
}

impl From<&ScanConfig> for EngineParams {
    fn from(cfg: &ScanConfig) -> Self {
        Self {
            rsi_period: cfg.rsi_period,
            momentum: cfg.momentum_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SignalEngine {
    params: EngineParams,
}

impl SignalEngine {
    pub fn new(params: EngineParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Compute every indicator the scanner reports on.
    pub fn compute_indicators(&self, closes: &[f64]) -> IndicatorResult {
        let macd = calculate_macd(closes);
        IndicatorResult {
            ema_fast: calculate_ema(closes, MACD_FAST),
            ema_slow: calculate_ema(closes, MACD_SLOW),
            rsi: calculate_rsi(closes, self.params.rsi_period),
            macd: macd.macd,
            macd_signal: macd.signal,
        }
    }

    /// MACD bullish-cross verdict on `closes`.
    pub fn evaluate_macd(&self, symbol: &str, closes: &[f64]) -> SignalVerdict {
        let indicators = self.compute_indicators(closes);
        let signal = if is_bullish_cross(&indicators.macd, &indicators.macd_signal) {
            Signal::MacdBullishCross
        } else {
            Signal::NoSignal
        };
        SignalVerdict::new(symbol, signal).with_indicators(indicators)
    }

    /// Momentum/volume verdict on a 24h snapshot.
    pub fn evaluate_momentum(&self, symbol: &str, snapshot: TickerSnapshot) -> SignalVerdict {
        let signal = if is_strong_move(&snapshot, &self.params.momentum) {
            Signal::MomentumSpike
        } else {
            Signal::NoSignal
        };
        SignalVerdict::new(symbol, signal).with_snapshot(snapshot)
    }

    /// Combined verdict: a MACD cross takes precedence over a momentum spike.
    pub fn evaluate(
        &self,
        symbol: &str,
        closes: &[f64],
        snapshot: Option<TickerSnapshot>,
    ) -> SignalVerdict {
        let mut verdict = self.evaluate_macd(symbol, closes);
        if let Some(snap) = snapshot {
            if verdict.signal == Signal::NoSignal
                && is_strong_move(&snap, &self.params.momentum)
            {
                verdict.signal = Signal::MomentumSpike;
            }
            verdict = verdict.with_snapshot(snap);
        }
        verdict
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(EngineParams::from(&ScanConfig::default()))
    }
}
