//! Build context carried by build lifecycle events.

use serde::{Deserialize, Serialize};

/// The slice of a running build the notifier needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    pub build_id: i64,
    /// Looked up in the project registry to get a display name.
    pub project_id: String,
    pub build_type_name: String,
    #[serde(default)]
    pub branch: Option<Branch>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// A VCS branch as reported by the CI server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub display_name: String,
}

impl Branch {
    /// Marker name the CI server uses for the default branch.
    pub const DEFAULT_BRANCH_NAME: &'static str = "<default>";

    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { name: name.into(), display_name: display_name.into() }
    }

    pub fn is_default(&self) -> bool {
        self.name == Self::DEFAULT_BRANCH_NAME
    }
}
