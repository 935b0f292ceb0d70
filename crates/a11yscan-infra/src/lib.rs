//! A11yscan infrastructure: process-local rate limiting and telemetry setup.

pub mod rate_limit;
pub mod telemetry;

pub use rate_limit::{RateLimitDecision, RateLimiter};
