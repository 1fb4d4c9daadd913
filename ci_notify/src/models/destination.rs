//! Recipients and their resolved webhook destinations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a user eligible to receive a notification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub String);

impl RecipientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipientId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Where one recipient wants notifications sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Webhook endpoint. Empty means the recipient never configured one.
    pub url: String,
    /// Username to post as, overriding the message's own.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Destination {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), display_name: None }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Display name override, ignoring blank values.
    pub fn username_override(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }
}
