//! Outbound transport seam.
//!
//! The request builder is transport-agnostic: it hands a fully-built
//! [`CollectRequest`] to whatever [`HitTransport`] the provider was
//! constructed with. The generic HTTP implementation lives here; the
//! platform-native SDK bridges implement the same trait outside this crate.

use std::time::Duration;

use async_trait::async_trait;

use crate::analytics::constants::COLLECT_ENDPOINT;
use crate::analytics::error::{internal_error, network_error, AnalyticsResult};

/// One fully-built hit: an absolute collect URL, dispatched as GET with no
/// body.
#[derive(Clone, Debug)]
pub struct CollectRequest {
    pub url: String,
}

/// Destination for built hits.
#[derive(Clone, Debug)]
pub enum CollectEndpoint {
    /// Production collection endpoint: <https://www.google-analytics.com/collect>
    Collect,
    /// Custom endpoint (primarily for tests and emulators).
    Custom(String),
}

impl CollectEndpoint {
    pub(crate) fn as_str(&self) -> &str {
        match self {
            CollectEndpoint::Collect => COLLECT_ENDPOINT,
            CollectEndpoint::Custom(url) => url,
        }
    }
}

#[async_trait]
pub trait HitTransport: Send + Sync {
    /// Delivers one hit. The provider invokes this on a detached task and
    /// discards the result; implementations must not rely on the caller
    /// observing errors.
    async fn submit(&self, request: CollectRequest) -> AnalyticsResult<()>;

    /// Pushes any locally queued hits out. Meaningful only for SDK-backed
    /// transports that batch internally.
    async fn flush(&self) {}
}

/// Generic HTTP transport used on desktop and console platforms.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> AnalyticsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| internal_error(format!("failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HitTransport for HttpTransport {
    async fn submit(&self, request: CollectRequest) -> AnalyticsResult<()> {
        let response = self
            .client
            .get(&request.url)
            .send()
            .await
            .map_err(|err| network_error(format!("failed to send analytics hit: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(network_error(format!(
            "collect endpoint rejected the hit with status {status}"
        )))
    }
}
