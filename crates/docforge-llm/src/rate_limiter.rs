//! Per-identity request gate with a fixed window
//!
//! The first call from an identity opens a window of `window` length with a
//! count of 1. Later calls inside the window increment the count until it
//! reaches `max_requests`; from then on they are denied without touching the
//! count. Once the clock passes the window's reset instant the next call opens
//! a fresh window.
//!
//! State is in-process only; a restart forgets every window.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use docforge_config::Config;
use tracing::{debug, warn};

/// Header carrying the remaining request count
pub const REMAINING_HEADER: &str = "X-RateLimit-Remaining";

/// Header carrying whole seconds until the window resets
pub const RESET_HEADER: &str = "X-RateLimit-Reset";

/// Time source for the limiter; swapped out in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    count: u32,
    reset_at: Instant,
}

/// Snapshot of an identity's quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub reset_in_ms: u64,
}

impl RateLimitStatus {
    /// Header pairs for a delivery layer. The reset value is rounded up to whole seconds.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (REMAINING_HEADER, self.remaining.to_string()),
            (RESET_HEADER, self.reset_in_ms.div_ceil(1000).to_string()),
        ]
    }
}

/// Thread-safe per-identity request counter
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, RateLimitWindow>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("window", &self.window)
            .field("max_requests", &self.max_requests)
            .finish_non_exhaustive()
    }
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self::with_clock(window, max_requests, Arc::new(SystemClock))
    }

    pub fn with_clock(window: Duration, max_requests: u32, clock: Arc<dyn Clock>) -> Self {
        debug!(
            window_ms = window.as_millis() as u64,
            max_requests, "Creating RateLimiter"
        );
        Self {
            window,
            max_requests,
            clock,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Limiter using `[rate_limit]` from configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rate_limit_window(), config.rate_limit_max_requests())
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, RateLimitWindow>> {
        // A panic while holding the lock cannot leave a window half-written.
        self.windows.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consume one slot for `identity` if any is left.
    pub fn allow(&self, identity: &str) -> bool {
        let now = self.clock.now();
        let mut windows = self.lock();

        match windows.get_mut(identity) {
            Some(window) if now <= window.reset_at => {
                if window.count >= self.max_requests {
                    warn!(
                        identity,
                        count = window.count,
                        max_requests = self.max_requests,
                        "Rate limit exceeded"
                    );
                    return false;
                }
                window.count += 1;
                debug!(identity, count = window.count, "Rate limit slot consumed");
                true
            }
            _ => {
                windows.insert(
                    identity.to_string(),
                    RateLimitWindow {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                debug!(identity, "Opened new rate limit window");
                true
            }
        }
    }

    /// Remaining quota for `identity` without consuming a slot.
    ///
    /// An unknown identity or an expired window reports the full quota and a
    /// zero reset time.
    #[must_use]
    pub fn status(&self, identity: &str) -> RateLimitStatus {
        let now = self.clock.now();
        let windows = self.lock();

        match windows.get(identity) {
            Some(window) if now <= window.reset_at => RateLimitStatus {
                remaining: self.max_requests.saturating_sub(window.count),
                reset_in_ms: u64::try_from(window.reset_at.duration_since(now).as_millis())
                    .unwrap_or(u64::MAX),
            },
            _ => RateLimitStatus {
                remaining: self.max_requests,
                reset_in_ms: 0,
            },
        }
    }

    /// Read-only pre-check: would `allow` succeed right now?
    #[must_use]
    pub fn would_allow(&self, identity: &str) -> bool {
        self.status(identity).remaining > 0
    }
}

#[cfg(test)]
pub(crate) mod test_clock {
    use super::Clock;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Clock that only moves when told to
    pub(crate) struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub(crate) fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub(crate) fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_clock::ManualClock;
    use super::*;

    fn limiter(max: u32) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(Duration::from_millis(60_000), max, clock.clone());
        (limiter, clock)
    }

    #[test]
    fn test_denies_after_max_requests_in_window() {
        let (limiter, _clock) = limiter(3);
        assert!(limiter.allow("alice"));
        assert!(limiter.allow("alice"));
        assert!(limiter.allow("alice"));
        assert!(!limiter.allow("alice"));
        assert!(!limiter.allow("alice"));
        assert_eq!(limiter.status("alice").remaining, 0);
    }

    #[test]
    fn test_window_expiry_resets_count_to_one() {
        let (limiter, clock) = limiter(2);
        assert!(limiter.allow("alice"));
        assert!(limiter.allow("alice"));
        assert!(!limiter.allow("alice"));

        // Exactly at the reset instant the window is still live.
        clock.advance(Duration::from_millis(60_000));
        assert!(!limiter.allow("alice"));

        clock.advance(Duration::from_millis(1));
        assert!(limiter.allow("alice"));
        assert_eq!(limiter.status("alice").remaining, 1);
        assert_eq!(limiter.status("alice").reset_in_ms, 60_000);
    }

    #[test]
    fn test_identities_are_independent() {
        let (limiter, _clock) = limiter(1);
        assert!(limiter.allow("alice"));
        assert!(!limiter.allow("alice"));
        assert!(limiter.allow("bob"));
    }

    #[test]
    fn test_status_for_unknown_identity_reports_full_quota() {
        let (limiter, _clock) = limiter(10);
        assert_eq!(
            limiter.status("nobody"),
            RateLimitStatus {
                remaining: 10,
                reset_in_ms: 0
            }
        );
    }

    #[test]
    fn test_status_counts_down_and_tracks_reset() {
        let (limiter, clock) = limiter(10);
        limiter.allow("alice");
        limiter.allow("alice");
        clock.advance(Duration::from_millis(15_500));

        let status = limiter.status("alice");
        assert_eq!(status.remaining, 8);
        assert_eq!(status.reset_in_ms, 44_500);
    }

    #[test]
    fn test_status_after_expiry_reports_full_quota() {
        let (limiter, clock) = limiter(10);
        limiter.allow("alice");
        clock.advance(Duration::from_millis(60_001));
        assert_eq!(limiter.status("alice").remaining, 10);
        assert_eq!(limiter.status("alice").reset_in_ms, 0);
    }

    #[test]
    fn test_would_allow_does_not_consume() {
        let (limiter, _clock) = limiter(1);
        assert!(limiter.would_allow("alice"));
        assert!(limiter.would_allow("alice"));
        assert!(limiter.allow("alice"));
        assert!(!limiter.would_allow("alice"));
    }

    #[test]
    fn test_headers_round_reset_up_to_seconds() {
        let status = RateLimitStatus {
            remaining: 4,
            reset_in_ms: 1_001,
        };
        let headers = status.headers();
        assert_eq!(headers[0], (REMAINING_HEADER, "4".to_string()));
        assert_eq!(headers[1], (RESET_HEADER, "2".to_string()));
    }

    #[test]
    fn test_concurrent_allow_never_over_admits() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 50));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || (0..20).filter(|_| limiter.allow("shared")).count())
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(admitted, 50);
    }
}
