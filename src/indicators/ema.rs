// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Formula:
//   k     = 2 / (period + 1)
//   EMA_t = price_t * k + EMA_{t-1} * (1 - k)
//
// The first EMA value is seeded with the arithmetic mean of the first `period`
// prices.
// =============================================================================

/// Compute the EMA series for `prices` over `period`.
///
/// Returns an empty `Vec` when `period == 0` or `prices.len() < period`.
/// Otherwise the output has `prices.len() - period + 1` elements, the first
/// corresponding to the price at index `period - 1`.
///
/// A non-finite intermediate value truncates the series at that point.
pub fn calculate_ema(prices: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || prices.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period + 1) as f64;

    let seed: f64 = prices[..period].iter().sum::<f64>() / period as f64;
    if !seed.is_finite() {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(prices.len() - period + 1);
    result.push(seed);

    let mut prev = seed;
    for &price in &prices[period..] {
        let ema = price * k + prev * (1.0 - k);
        if !ema.is_finite() {
            break;
        }
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ascending(n: usize) -> Vec<f64> {
        (1..=n).map(|i| i as f64).collect()
    }

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_shorter_than_period_is_empty() {
        assert!(calculate_ema(&[1.0, 2.0], 5).is_empty());
        assert!(calculate_ema(&ascending(25), 26).is_empty());
    }

    #[test]
    fn ema_period_equals_length_yields_mean() {
        let ema = calculate_ema(&[2.0, 4.0, 6.0], 3);
        assert_eq!(ema.len(), 1);
        assert!((ema[0] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn ema_period_one_tracks_prices() {
        let prices = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(calculate_ema(&prices, 1), prices.to_vec());
    }

    #[test]
    fn ema_output_length() {
        for (n, period) in [(10, 5), (200, 12), (200, 26), (26, 26), (30, 9)] {
            assert_eq!(calculate_ema(&ascending(n), period).len(), n - period + 1);
        }
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of 1..=10: seed 3.0, k = 1/3.
        let prices = ascending(10);
        let ema = calculate_ema(&prices, 5);

        let k = 2.0 / 6.0;
        let mut expected = vec![3.0];
        for &p in &prices[5..] {
            let prev = *expected.last().unwrap();
            expected.push(p * k + prev * (1.0 - k));
        }
        assert_eq!(ema.len(), expected.len());
        for (a, b) in ema.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_nan_truncates_series() {
        let ema = calculate_ema(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 3);
        assert_eq!(ema.len(), 1);
    }

    #[test]
    fn ema_is_deterministic() {
        let prices: Vec<f64> = (0..120).map(|i| 100.0 + (i as f64 * 0.37).sin()).collect();
        let a = calculate_ema(&prices, 12);
        let b = calculate_ema(&prices, 12);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }
}
