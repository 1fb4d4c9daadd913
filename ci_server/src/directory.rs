//! Project and user directory: the host-side store behind the notifier's
//! lookup ports, loaded once from a JSON file.
//!
//! ```json
//! {
//!   "projects": { "proj1": "Foo" },
//!   "users": { "alice": { "DiscordWebHookURL": "https://...", "DiscordUsername": "CI" } }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ci_notify::{Destination, ProjectRegistry, RecipientId, UserConfigResolver};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read directory file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse directory file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// User properties as stored by the host, keyed by the notifier's property keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSettings {
    #[serde(rename = "DiscordWebHookURL", default)]
    pub webhook_url: Option<String>,
    #[serde(rename = "DiscordUsername", default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Directory {
    #[serde(default)]
    projects: HashMap<String, String>,
    #[serde(default)]
    users: HashMap<RecipientId, UserSettings>,
}

impl Directory {
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let raw = std::fs::read(path).map_err(|source| DirectoryError::Io { path: path.to_path_buf(), source })?;
        let directory: Self = serde_json::from_slice(&raw)
            .map_err(|source| DirectoryError::Parse { path: path.to_path_buf(), source })?;

        tracing::info!(
            path = %path.display(),
            projects = directory.projects.len(),
            users = directory.users.len(),
            "Loaded notification directory"
        );
        Ok(directory)
    }
}

impl ProjectRegistry for Directory {
    fn project_name(&self, project_id: &str) -> Option<String> {
        self.projects.get(project_id).cloned()
    }
}

impl UserConfigResolver for Directory {
    /// A known user without a webhook URL resolves to an empty URL, which the
    /// delivery client reports as a configuration error.
    fn resolve(&self, recipient: &RecipientId) -> Option<Destination> {
        let settings = self.users.get(recipient)?;
        Some(Destination {
            url: settings.webhook_url.clone().unwrap_or_default(),
            display_name: settings.username.clone(),
        })
    }
}
