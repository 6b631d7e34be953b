// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the scanner uses.
// Insufficient input never errors: series functions return an empty `Vec`,
// verdict functions return `false`.

pub mod ema;
pub mod macd;
pub mod rsi;

pub use ema::calculate_ema;
pub use macd::{calculate_macd, is_bullish_cross, macd_bullish_cross, MacdSeries};
pub use rsi::{calculate_rsi, DEFAULT_RSI_PERIOD};
