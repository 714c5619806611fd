//! HTTP fetch client with dependency tagging.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::dependency::DependencyTag;
use crate::retry::RetryPolicy;
use crate::timeout::{TimeoutConfig, DEFAULT_CONNECT_TIMEOUT};

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(url.to_string())
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if err.is_decode() {
            FetchError::Deserialization(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from a dependency tag's defaults.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self {
            timeout: TimeoutConfig::from_total(tag.default_timeout()),
            retry: RetryPolicy::new(tag.default_max_retries()),
        }
    }
}

/// JSON-over-HTTP client rooted at a base URL.
///
/// Provides automatic timeout and retry for outbound requests, with the
/// policy picked by the request's [`DependencyTag`].
#[derive(Debug, Clone)]
pub struct FetchClient {
    http: reqwest::Client,
    base_url: String,
    policies: HashMap<DependencyTag, FetchPolicy>,
}

impl FetchClient {
    /// Create a new fetch client.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .user_agent(concat!("cart/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policies: HashMap::new(),
        })
    }

    /// Override the policy used for one dependency.
    pub fn with_policy(mut self, tag: DependencyTag, policy: FetchPolicy) -> Self {
        self.policies.insert(tag, policy);
        self
    }

    /// Policy that applies to `tag`.
    pub fn policy_for(&self, tag: DependencyTag) -> FetchPolicy {
        self.policies
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| FetchPolicy::from_tag(tag))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path below the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch with automatic timeout and retry based on dependency tag.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        tag: DependencyTag,
    ) -> Result<T, FetchError> {
        let policy = self.policy_for(tag);
        self.fetch_with_policy(path, tag, &policy).await
    }

    /// Fetch with explicit policy override.
    pub async fn fetch_with_policy<T: DeserializeOwned>(
        &self,
        path: &str,
        tag: DependencyTag,
        policy: &FetchPolicy,
    ) -> Result<T, FetchError> {
        let url = self.url(path);
        let mut attempt = 0;

        loop {
            match self.attempt(&url, policy).await {
                Ok(value) => {
                    debug!(dependency = %tag, %url, attempt, "fetch succeeded");
                    return Ok(value);
                }
                Err(err) if policy.retry.should_retry(&err, attempt) => {
                    let delay = policy.retry.backoff.delay_for_attempt(attempt);
                    warn!(dependency = %tag, %url, attempt, error = %err, ?delay, "retrying fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(dependency = %tag, %url, attempt, error = %err, "fetch failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(
        &self,
        url: &str,
        policy: &FetchPolicy,
    ) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(url)
            .timeout(policy.timeout.total)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, url))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_url_joining() {
        let client = FetchClient::new("http://localhost:3333/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3333");
        assert_eq!(client.url("/stock/1"), "http://localhost:3333/stock/1");
        assert_eq!(client.url("products"), "http://localhost:3333/products");
    }

    #[test]
    fn test_policy_defaults_come_from_tag() {
        let client = FetchClient::new("http://localhost").unwrap();
        assert_eq!(
            client.policy_for(DependencyTag::Inventory),
            FetchPolicy::from_tag(DependencyTag::Inventory)
        );
    }

    #[test]
    fn test_policy_override() {
        let policy = FetchPolicy::new(
            TimeoutConfig::from_total(Duration::from_millis(100)),
            RetryPolicy::none(),
        );
        let client = FetchClient::new("http://localhost")
            .unwrap()
            .with_policy(DependencyTag::Catalog, policy.clone());

        assert_eq!(client.policy_for(DependencyTag::Catalog), policy);
        assert_ne!(client.policy_for(DependencyTag::Inventory), policy);
    }
}
