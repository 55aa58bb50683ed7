//! In-process sliding-window rate limiter.
//!
//! State lives in this process only. Running several API instances gives each
//! its own budget, so the effective limit scales with the instance count.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Spin requests allowed per user per window.
pub const DEFAULT_SPIN_LIMIT: usize = 60;

/// Order creations allowed per user per window.
pub const DEFAULT_ORDER_LIMIT: usize = 20;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Rejection carrying how long until the oldest hit leaves the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimited {
    pub retry_after: Duration,
}

/// Idle buckets are dropped at most this often, on the next check.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Bucket {
    window: Duration,
    hits: VecDeque<Instant>,
}

impl Bucket {
    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.hits.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.hits.pop_front();
            } else {
                break;
            }
        }
    }
}

#[derive(Debug, Default)]
struct LimiterState {
    buckets: HashMap<(&'static str, String), Bucket>,
    last_sweep: Option<Instant>,
}

impl LimiterState {
    /// Drop every bucket whose hits have all left their window.
    fn sweep(&mut self, now: Instant) {
        self.buckets.retain(|_, bucket| {
            bucket.prune(now);
            !bucket.hits.is_empty()
        });
        self.last_sweep = Some(now);
    }
}

#[derive(Debug, Default)]
pub struct SlidingWindowLimiter {
    state: Mutex<LimiterState>,
}

impl SlidingWindowLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit for `(scope, key)` unless `limit` hits already fall inside
    /// the trailing `window`.
    pub fn check(
        &self,
        scope: &'static str,
        key: &str,
        limit: usize,
        window: Duration,
    ) -> Result<(), RateLimited> {
        self.check_at(scope, key, limit, window, Instant::now())
    }

    pub fn check_at(
        &self,
        scope: &'static str,
        key: &str,
        limit: usize,
        window: Duration,
        now: Instant,
    ) -> Result<(), RateLimited> {
        // A poisoned lock only means another request panicked mid-update; the
        // buckets are still structurally valid.
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let sweep_due = state
            .last_sweep
            .map_or(true, |last| now.saturating_duration_since(last) >= SWEEP_INTERVAL);
        if sweep_due {
            state.sweep(now);
        }

        let bucket = state
            .buckets
            .entry((scope, key.to_string()))
            .or_insert_with(|| Bucket {
                window,
                hits: VecDeque::new(),
            });
        bucket.window = window;
        bucket.prune(now);

        if bucket.hits.len() >= limit {
            let oldest = bucket.hits.front().copied().unwrap_or(now);
            let retry_after = window.saturating_sub(now.saturating_duration_since(oldest));
            return Err(RateLimited { retry_after });
        }

        bucket.hits.push_back(now);
        Ok(())
    }

    /// Number of `(scope, key)` buckets currently held.
    pub fn tracked_keys(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .buckets
            .len()
    }
}
