//! Storefront API client with dependency tagging, timeouts and retries.
//!
//! This crate provides:
//! - `FetchClient` - JSON fetch with automatic timeout/retry
//! - `DependencyTag` - Semantic dependency categories
//! - `TimeoutConfig` - Per-dependency timeouts
//! - `RetryPolicy` - Retry strategies
//! - `StorefrontClient` - The stock and catalog services the cart consumes

mod client;
mod dependency;
mod retry;
mod storefront;
mod timeout;

pub use client::*;
pub use dependency::*;
pub use retry::*;
pub use storefront::*;
pub use timeout::*;
