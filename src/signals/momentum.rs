// =============================================================================
// Momentum / Volume Filter
// =============================================================================
//
// A "strong move" is a 24h percent change beyond the configured threshold in
// either direction, on quote volume above the configured floor. Both bounds
// are strict.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::TickerSnapshot;

/// Threshold pair for the momentum filter, supplied by the scan config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumThresholds {
    /// Absolute 24h percent change that must be exceeded.
    pub pct_change: f64,
    /// 24h quote volume (USDT) that must be exceeded.
    pub quote_volume: f64,
}

/// `true` iff `|price_change_percent| > pct_change` and
/// `quote_volume > quote_volume`.
pub fn is_strong_move(snapshot: &TickerSnapshot, thresholds: &MomentumThresholds) -> bool {
    snapshot.price_change_percent.abs() > thresholds.pct_change
        && snapshot.quote_volume > thresholds.quote_volume
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: MomentumThresholds = MomentumThresholds {
        pct_change: 2.0,
        quote_volume: 4e7,
    };

    fn snap(pct: f64, vol: f64) -> TickerSnapshot {
        TickerSnapshot {
            last_price: 100.0,
            quote_volume: vol,
            price_change_percent: pct,
        }
    }

    #[test]
    fn strong_move_on_big_change_and_volume() {
        assert!(is_strong_move(&snap(3.0, 5e7), &THRESHOLDS));
    }

    #[test]
    fn small_change_is_not_strong() {
        assert!(!is_strong_move(&snap(1.0, 5e7), &THRESHOLDS));
    }

    #[test]
    fn negative_change_counts_by_magnitude() {
        assert!(is_strong_move(&snap(-3.0, 5e7), &THRESHOLDS));
        assert!(!is_strong_move(&snap(-1.5, 5e7), &THRESHOLDS));
    }

    #[test]
    fn thin_volume_is_not_strong() {
        assert!(!is_strong_move(&snap(8.0, 1e6), &THRESHOLDS));
    }

    #[test]
    fn thresholds_are_strict() {
        assert!(!is_strong_move(&snap(2.0, 5e7), &THRESHOLDS));
        assert!(!is_strong_move(&snap(3.0, 4e7), &THRESHOLDS));
    }
}
