use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window (0 when denied).
    pub remaining: u32,
    /// Unix milliseconds at which the current window resets.
    pub reset_at_ms: u64,
}

/// Per-key request counter over one fixed sliding window.
#[derive(Clone)]
struct WindowBucket {
    count: u32,
    reset_at: Instant,
    reset_at_ms: u64,
}

impl WindowBucket {
    fn new(window: Duration) -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + window,
            reset_at_ms: unix_ms_after(window),
        }
    }

    fn check_and_increment(&mut self, limit: u32, window: Duration) -> (bool, u32) {
        let now = Instant::now();

        // Window expired: start a fresh one
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + window;
            self.reset_at_ms = unix_ms_after(window);
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }
}

fn unix_ms_after(window: Duration) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
        + window.as_millis() as u64
}

/// Sharded in-memory rate limiter with per-client-key sliding windows.
///
/// Process-wide, best-effort state: concurrent requests for the same key race
/// between shard lock acquisitions, and nothing persists across restarts.
/// This is an advisory throttle, not a distributed limiter.
///
/// Uses multiple shards (separate HashMaps) so different client keys usually
/// lock different shards.
#[derive(Clone)]
pub struct RateLimiter {
    shards: Vec<Arc<Mutex<HashMap<String, WindowBucket>>>>,
    shard_count: usize,
    window: Duration,
    // Maximum number of buckets per shard before cleanup/eviction
    max_buckets: usize,
}

impl RateLimiter {
    /// Create a limiter with the given window length and default shard count (16).
    pub fn new(window_ms: u64) -> Self {
        Self::with_shards(window_ms, 16)
    }

    /// Create a limiter with a custom shard count (power of two distributes best).
    pub fn with_shards(window_ms: u64, shard_count: usize) -> Self {
        let shards = (0..shard_count)
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            shard_count,
            window: Duration::from_millis(window_ms),
            max_buckets: 10_000,
        }
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shard_count
    }

    /// Count one request against `key` and decide whether it is allowed.
    pub async fn check(&self, key: &str, max_requests: u32) -> RateLimitDecision {
        let shard = &self.shards[self.shard_index(key)];
        let mut buckets = shard.lock().await;

        // At capacity: drop expired buckets, then evict the oldest if still full
        if buckets.len() >= self.max_buckets {
            let now = Instant::now();
            let grace = self.window;
            buckets.retain(|_, bucket| {
                bucket.reset_at > now || now.duration_since(bucket.reset_at) < grace
            });

            if buckets.len() >= self.max_buckets {
                let oldest_key = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(key_to_remove) = oldest_key {
                    buckets.remove(&key_to_remove);
                    tracing::debug!(
                        removed_key = %key_to_remove,
                        "Evicted oldest rate limit bucket at capacity"
                    );
                }
            }
        }

        let window = self.window;
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| WindowBucket::new(window));

        let (allowed, remaining) = bucket.check_and_increment(max_requests, window);
        RateLimitDecision {
            allowed,
            remaining,
            reset_at_ms: bucket.reset_at_ms,
        }
    }
}
