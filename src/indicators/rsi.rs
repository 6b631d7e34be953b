// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the mean of the first
//          `period` gains / losses.
// Step 3 — Wilder's smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
// =============================================================================

/// Look-back used when the scan config does not override it.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Compute the RSI series for `prices` over `period`.
///
/// One value is produced per delta starting at delta index `period - 1`, so
/// the output has `prices.len() - period` elements.
///
/// # Edge cases
/// - `period == 0` or `prices.len() < period + 1` => empty vec
/// - no losses but some gains => 100.0
/// - no movement at all => RS is taken as 0, giving 0.0
pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period + 1 {
        return Vec::new();
    }

    let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();

    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| (g + gain(d), l + loss(d)));

    let period_f = period as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(deltas.len() - period + 1);
    match rsi_from_averages(avg_gain, avg_loss) {
        Some(rsi) => result.push(rsi),
        None => return result,
    }

    for &delta in &deltas[period..] {
        avg_gain = (avg_gain * (period_f - 1.0) + gain(delta)) / period_f;
        avg_loss = (avg_loss * (period_f - 1.0) + loss(delta)) / period_f;

        match rsi_from_averages(avg_gain, avg_loss) {
            Some(rsi) => result.push(rsi),
            None => break,
        }
    }

    result
}

fn gain(delta: f64) -> f64 {
    if delta > 0.0 {
        delta
    } else {
        0.0
    }
}

fn loss(delta: f64) -> f64 {
    if delta < 0.0 {
        -delta
    } else {
        0.0
    }
}

/// Map average gain / loss to an RSI value in [0, 100]; `None` if non-finite.
///
/// Zero average loss with positive gain yields 100, the limit of the formula.
/// Substituting RS = 0 whenever avg_loss is 0 would instead report an
/// all-gain series as RSI 0. A flat series (no gain, no loss) still maps to 0.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain > 0.0 {
        100.0
    } else {
        let rs = if avg_loss == 0.0 { 0.0 } else { avg_gain / avg_loss };
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
