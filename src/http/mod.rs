//! HTTP client module
//!
//! Shared HTTP plumbing for the remote sources: retry with backoff, bounded
//! timeouts, and token-bucket rate limiting.

mod client;
mod rate_limit;

#[cfg(test)]
mod tests;

pub use client::{BackoffType, HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
