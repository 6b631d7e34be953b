// =============================================================================
// Pingr — Binance futures indicator scanner with Discord alerts
// =============================================================================
//
// `indicators` and `signals` are pure and perform no I/O. Everything that
// talks to the network (`binance`, `notifier`, `runtime_config`) is wired
// together by `scanner` and exposed over HTTP by `api`.
// =============================================================================

pub mod api;
pub mod app_state;
pub mod binance;
pub mod indicators;
pub mod notifier;
pub mod runtime_config;
pub mod scanner;
pub mod settings;
pub mod signals;
pub mod types;
