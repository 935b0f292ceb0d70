mod limiter;

pub use limiter::{RateLimitDecision, RateLimiter};
