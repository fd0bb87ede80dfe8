//! Composable retry + fallback policy.
//!
//! The policy is generic over the actions it runs: a bounded retry stage
//! around a primary action, wrapped by a single fallback stage that only
//! observes full exhaustion. It knows nothing about what the actions do.

pub mod policy;

pub use policy::{Completion, DEFAULT_MAX_ATTEMPTS, FallbackFailed, RetryWithFallback};
