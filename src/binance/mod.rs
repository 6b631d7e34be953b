pub mod client;
pub mod rate_limit;

pub use client::{BinanceClient, BINANCE_FUTURES_BASE};
pub use rate_limit::{RateLimitSnapshot, RateLimitTracker};
