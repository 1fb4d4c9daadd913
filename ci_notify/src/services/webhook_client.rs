//! HTTP client that posts one notification embed to one webhook.
//!
//! Delivery is best-effort: a single POST with a bounded timeout, no retries.
//! Every failure comes back as a [`DeliveryOutcome::Failed`] value so the
//! caller can keep going with the remaining destinations.

use std::time::{Duration, Instant};

use reqwest::Url;
use tracing::{info_span, Instrument};

use crate::error::{DeliveryError, Result};
use crate::models::destination::Destination;
use crate::models::message::NotificationMessage;

/// Bytes of a rejected response body kept for diagnostics.
const MAX_ERROR_BODY: usize = 1024;

/// Configuration for the webhook client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Upper bound for one delivery, connect through response.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("ci-notify/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Terminal result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { status_code: u16 },
    Failed(DeliveryError),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        match self {
            Self::Delivered { .. } => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// Pooled webhook client. Cheap to clone; holds no per-delivery state.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl WebhookClient {
    /// Creates a client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::ConfigurationError` if the underlying HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| DeliveryError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Posts `message` to `destination`.
    ///
    /// A blank URL fails with `ConfigurationError` and a malformed one with
    /// `InvalidUrl`, both without touching the network. The destination's
    /// display name, if set, replaces the message username for this request
    /// only.
    pub async fn deliver(
        &self,
        message: &NotificationMessage,
        destination: &Destination,
    ) -> DeliveryOutcome {
        let url = match validate_url(&destination.url) {
            Ok(url) => url,
            Err(e) => {
                crate::metrics::delivery_failed(e.category());
                return DeliveryOutcome::Failed(e);
            }
        };

        let span = info_span!("webhook_delivery", host = url.host_str().unwrap_or_default());
        let start = Instant::now();

        let result = self
            .post(url, message, destination.username_override())
            .instrument(span)
            .await;

        match result {
            Ok(status_code) => {
                crate::metrics::delivery_succeeded(start.elapsed().as_millis() as u64);
                DeliveryOutcome::Delivered { status_code }
            }
            Err(e) => {
                crate::metrics::delivery_failed(e.category());
                DeliveryOutcome::Failed(e)
            }
        }
    }

    async fn post(
        &self,
        url: Url,
        message: &NotificationMessage,
        username_override: Option<&str>,
    ) -> Result<u16> {
        let payload = message.to_payload(username_override);
        let start = Instant::now();

        let response = self.client.post(url).json(&payload).send().await.map_err(|e| {
            tracing::debug!(duration_ms = start.elapsed().as_millis() as u64, "Webhook request failed: {e}");
            self.categorize(&e)
        })?;

        let status = response.status();
        tracing::debug!(
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Received webhook response"
        );

        if status.is_success() {
            return Ok(status.as_u16());
        }

        let body = match response.bytes().await {
            Ok(bytes) => {
                let end = bytes.len().min(MAX_ERROR_BODY);
                String::from_utf8_lossy(&bytes[..end]).into_owned()
            }
            Err(e) => format!("[failed to read response body: {e}]"),
        };
        tracing::debug!(status = status.as_u16(), body = %body, "Webhook rejected the message");

        Err(DeliveryError::http_status(status.as_u16(), body))
    }

    fn categorize(&self, error: &reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::timeout(self.config.timeout.as_secs())
        } else if error.is_connect() {
            DeliveryError::network(format!("connection failed: {error}"))
        } else if error.is_builder() {
            let url = error.url().map(Url::to_string).unwrap_or_default();
            DeliveryError::invalid_url(url, error.to_string())
        } else {
            DeliveryError::network(error.to_string())
        }
    }
}

/// Checks a destination URL before any I/O.
fn validate_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DeliveryError::configuration("webhook URL is not set"));
    }

    let url = Url::parse(trimmed).map_err(|e| DeliveryError::invalid_url(trimmed, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DeliveryError::invalid_url(trimmed, format!("unsupported scheme {other:?}"))),
    }
}
