//! Notification message and its webhook wire format.
//!
//! A [`NotificationMessage`] is built once per event and shared by every
//! delivery of that event. Per-destination differences (the username
//! override) are applied when borrowing it into a [`WebhookPayload`], so the
//! message itself is never mutated between deliveries.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Embed accent colors. A pure function of the event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedColor {
    Blue,
    Green,
    Red,
    Orange,
}

impl EmbedColor {
    /// Packed `0xRRGGBB` value sent on the wire.
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Blue => 0x3498DB,
            Self::Green => 0x2ECC71,
            Self::Red => 0xE74C3C,
            Self::Orange => 0xE67E22,
        }
    }
}

/// One name/value row in an embed. Order of fields is display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self { name: name.into(), value: value.into(), inline }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedThumbnail {
    pub url: String,
}

/// A single-embed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub color: EmbedColor,
    pub timestamp: Option<DateTime<Utc>>,
    pub footer: Option<EmbedFooter>,
    pub thumbnail: Option<EmbedThumbnail>,
    pub fields: Vec<EmbedField>,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, description: impl Into<String>, color: EmbedColor) -> Self {
        Self {
            username: None,
            title: title.into(),
            description: description.into(),
            url: None,
            color,
            timestamp: None,
            footer: None,
            thumbnail: None,
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<EmbedField>) -> Self {
        self.fields = fields;
        self
    }

    /// Borrows this message into the JSON body for one destination.
    ///
    /// `username_override`, when present, replaces the message's own username
    /// for this payload only.
    pub fn to_payload<'a>(&'a self, username_override: Option<&'a str>) -> WebhookPayload<'a> {
        WebhookPayload {
            username: username_override.or(self.username.as_deref()),
            embeds: [EmbedPayload {
                title: &self.title,
                description: &self.description,
                url: self.url.as_deref(),
                color: self.color.rgb(),
                timestamp: self.timestamp.map(|ts| ts.to_rfc3339()),
                footer: self.footer.as_ref(),
                thumbnail: self.thumbnail.as_ref(),
                fields: &self.fields,
            }],
        }
    }
}

/// Webhook request body: an optional username and exactly one embed.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub embeds: [EmbedPayload<'a>; 1],
}

#[derive(Debug, Serialize)]
pub struct EmbedPayload<'a> {
    pub title: &'a str,
    pub description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'a str>,
    pub color: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<&'a EmbedFooter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<&'a EmbedThumbnail>,
    pub fields: &'a [EmbedField],
}
