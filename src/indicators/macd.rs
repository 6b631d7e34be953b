// =============================================================================
// MACD (Moving Average Convergence Divergence) and bullish-cross detection
// =============================================================================
//
//   MACD line   = EMA(fast) - EMA(slow)   (fast EMA truncated to slow's tail)
//   Signal line = EMA(MACD line, signal)
//
// A bullish cross is the MACD line moving from below the signal line to at or
// above it between the last two samples.
// =============================================================================

use super::ema::calculate_ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// Fewer MACD points than this resolves to "no signal".
pub const MIN_MACD_POINTS: usize = 10;

/// MACD and signal lines, both aligned to the tail of the input prices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl MacdSeries {
    /// `true` iff `macd[-2] < signal[-2]` and `macd[-1] >= signal[-1]`.
    ///
    /// Both lines are indexed from their ends, so the comparison holds even
    /// though the signal line is shorter than the MACD line.
    pub fn is_bullish_cross(&self) -> bool {
        is_bullish_cross(&self.macd, &self.signal)
    }
}

/// Slice form of [`MacdSeries::is_bullish_cross`].
pub fn is_bullish_cross(macd: &[f64], signal: &[f64]) -> bool {
    if macd.len() < MIN_MACD_POINTS || signal.len() < 2 {
        return false;
    }
    let m = &macd[macd.len() - 2..];
    let s = &signal[signal.len() - 2..];
    m[0] < s[0] && m[1] >= s[1]
}

/// Compute MACD with the conventional 12/26/9 periods.
pub fn calculate_macd(prices: &[f64]) -> MacdSeries {
    calculate_macd_with(prices, MACD_FAST, MACD_SLOW, MACD_SIGNAL)
}

/// Compute MACD with explicit periods.
///
/// The signal line is only computed when the MACD line has at least
/// [`MIN_MACD_POINTS`] values; otherwise it is left empty.
pub fn calculate_macd_with(
    prices: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> MacdSeries {
    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let n = ema_fast.len().min(ema_slow.len());
    let macd: Vec<f64> = ema_fast[ema_fast.len() - n..]
        .iter()
        .zip(&ema_slow[ema_slow.len() - n..])
        .map(|(f, s)| f - s)
        .collect();

    if macd.len() < MIN_MACD_POINTS {
        return MacdSeries {
            macd,
            signal: Vec::new(),
        };
    }

    let signal = calculate_ema(&macd, signal);
    MacdSeries { macd, signal }
}

/// Bullish MACD cross on the last two samples of `prices`.
///
/// Insufficient data resolves to `false`, never an error.
pub fn macd_bullish_cross(prices: &[f64]) -> bool {
    calculate_macd(prices).is_bullish_cross()
}
