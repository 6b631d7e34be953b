// =============================================================================
// Rate-Limit Tracker — monitors Binance futures request weight
// =============================================================================
//
// USDⓈ-M futures allow 2400 request weight per minute per IP. The tracker
// reads `X-MBX-USED-WEIGHT-1M` after every response and keeps an atomic
// counter that any task may query lock-free. Binance resets the window
// itself, so the header carries the authoritative figure while it is fresh.
// A reading older than one window is treated as zero.
// =============================================================================

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Hard ceiling at which we refuse to send additional requests.
const WEIGHT_HARD_LIMIT: u32 = 2000;
/// Soft warning threshold.
const WEIGHT_WARN_THRESHOLD: u32 = 1600;

const USED_WEIGHT_HEADER: &str = "X-MBX-USED-WEIGHT-1M";

/// Length of the Binance weight window.
pub const WEIGHT_WINDOW: Duration = Duration::from_secs(60);

pub struct RateLimitTracker {
    used_weight_1m: AtomicU32,
    /// Milliseconds since `epoch` at which `used_weight_1m` was last set.
    updated_at_ms: AtomicU64,
    epoch: Instant,
    window: Duration,
}

/// Serialisable view of the tracker for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    pub used_weight_1m: u32,
    pub hard_limit: u32,
}

impl RateLimitTracker {
    pub fn new() -> Self {
        Self::with_window(WEIGHT_WINDOW)
    }

    /// Tracker whose readings expire after `window` instead of one minute.
    pub fn with_window(window: Duration) -> Self {
        Self {
            used_weight_1m: AtomicU32::new(0),
            updated_at_ms: AtomicU64::new(0),
            epoch: Instant::now(),
            window,
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Last reported weight, or 0 once that reading has outlived the window.
    pub fn used_weight(&self) -> u32 {
        let weight = self.used_weight_1m.load(Ordering::Relaxed);
        let age_ms = self
            .now_ms()
            .saturating_sub(self.updated_at_ms.load(Ordering::Relaxed));
        if u128::from(age_ms) >= self.window.as_millis() {
            0
        } else {
            weight
        }
    }

    /// Update the weight counter from Binance response headers. Responses
    /// relayed by a proxy may lack the header; those are ignored.
    pub fn update_from_headers(&self, headers: &reqwest::header::HeaderMap) {
        let Some(w) = headers
            .get(USED_WEIGHT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u32>().ok())
        else {
            return;
        };

        let prev = self.used_weight();
        self.used_weight_1m.store(w, Ordering::Relaxed);
        self.updated_at_ms.store(self.now_ms(), Ordering::Relaxed);
        if w >= WEIGHT_WARN_THRESHOLD && prev < WEIGHT_WARN_THRESHOLD {
            warn!(
                used_weight = w,
                hard_limit = WEIGHT_HARD_LIMIT,
                "rate-limit weight crossed warning threshold"
            );
        }
        debug!(used_weight_1m = w, "rate-limit weight updated from header");
    }

    /// Return `true` if `weight` more request weight stays within the hard
    /// limit.
    pub fn can_send_request(&self, weight: u32) -> bool {
        let current = self.used_weight();
        let allowed = current.saturating_add(weight) <= WEIGHT_HARD_LIMIT;
        if !allowed {
            warn!(
                current_weight = current,
                requested_weight = weight,
                hard_limit = WEIGHT_HARD_LIMIT,
                "request blocked: would exceed rate limit"
            );
        }
        allowed
    }

    pub fn snapshot(&self) -> RateLimitSnapshot {
        RateLimitSnapshot {
            used_weight_1m: self.used_weight(),
            hard_limit: WEIGHT_HARD_LIMIT,
        }
    }
}

impl Default for RateLimitTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimitTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitTracker")
            .field("used_weight_1m", &self.used_weight())
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn headers(weight: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("x-mbx-used-weight-1m", HeaderValue::from_str(weight).unwrap());
        h
    }

    #[test]
    fn starts_empty() {
        let t = RateLimitTracker::new();
        assert_eq!(t.snapshot().used_weight_1m, 0);
        assert!(t.can_send_request(5));
    }

    #[test]
    fn header_updates_weight() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("321"));
        assert_eq!(t.snapshot().used_weight_1m, 321);
    }

    #[test]
    fn missing_or_garbage_header_is_ignored() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("40"));
        t.update_from_headers(&HeaderMap::new());
        t.update_from_headers(&headers("lots"));
        assert_eq!(t.snapshot().used_weight_1m, 40);
    }

    #[test]
    fn blocks_near_hard_limit() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("1999"));
        assert!(t.can_send_request(1));
        assert!(!t.can_send_request(2));
    }

    #[test]
    fn oversized_header_blocks_without_overflow() {
        let t = RateLimitTracker::new();
        t.update_from_headers(&headers("4294967295"));
        assert_eq!(t.snapshot().used_weight_1m, u32::MAX);
        assert!(!t.can_send_request(1));
    }

    #[test]
    fn stale_reading_expires_after_window() {
        let t = RateLimitTracker::with_window(Duration::from_millis(50));
        t.update_from_headers(&headers("2000"));
        assert!(!t.can_send_request(1));

        std::thread::sleep(Duration::from_millis(80));
        assert_eq!(t.used_weight(), 0);
        assert!(t.can_send_request(1));
    }

    #[test]
    fn fresh_reading_replaces_expired_one() {
        let t = RateLimitTracker::with_window(Duration::from_millis(50));
        t.update_from_headers(&headers("1900"));
        std::thread::sleep(Duration::from_millis(80));
        t.update_from_headers(&headers("12"));
        assert_eq!(t.snapshot().used_weight_1m, 12);
    }
}
