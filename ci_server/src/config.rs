//! Notifier host configuration: loaded from environment variables.

use std::time::Duration;

use ci_notify::ClientConfig;

#[derive(Clone, Debug)]
pub struct NotifyConfig {
    /// Shared secret for HMAC validation of inbound events.
    pub ingest_secret: String,
    /// Timeout for one outbound webhook request, in seconds.
    pub webhook_timeout_secs: u64,
    /// User agent sent with outbound webhook requests.
    pub user_agent: String,
}

impl NotifyConfig {
    pub fn from_env() -> Self {
        let ingest_secret = std::env::var("NOTIFY_INGEST_SECRET").unwrap_or_default();
        let webhook_timeout_secs = std::env::var("NOTIFY_WEBHOOK_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(10);
        let user_agent = std::env::var("NOTIFY_USER_AGENT")
            .unwrap_or_else(|_| concat!("ci-notify/", env!("CARGO_PKG_VERSION")).to_string());

        if ingest_secret.is_empty() {
            tracing::warn!("NOTIFY_INGEST_SECRET not set -- event signature validation disabled");
        }

        Self { ingest_secret, webhook_timeout_secs, user_agent }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.webhook_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}
