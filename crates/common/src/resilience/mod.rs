//! Resilience patterns used by the request pipeline
//!
//! - **Retry**: retry budget, exponential backoff and pluggable retry
//!   eligibility (`RetryPolicy`)
//! - **Single flight**: coalesces concurrent callers onto one in-progress
//!   operation so that, for example, a burst of 401s triggers exactly one
//!   token refresh

pub mod retry;
pub mod single_flight;

// Re-export retry types
pub use retry::{policies, RetryConfig, RetryConfigBuilder, RetryDecision, RetryPolicy};
pub use single_flight::SingleFlight;
