// =============================================================================
// Signals Module
// =============================================================================
//
// Alert decisions built on top of the indicators:
// - Momentum / volume filter on the 24h ticker
// - Signal engine combining MACD cross and momentum into a verdict

pub mod engine;
pub mod momentum;

pub use engine::{EngineParams, SignalEngine};
pub use momentum::{is_strong_move, MomentumThresholds};
