//! Notification events emitted by the CI server.
//!
//! One variant per notifier callback the host exposes. Each variant carries
//! only what its message needs; the host serializes them with a `type` tag.

use serde::{Deserialize, Serialize};

use crate::models::build::BuildContext;

/// Events the CI server asks us to notify about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotificationEvent {
    /// Build execution has started.
    BuildStarted { build: BuildContext },
    /// Build finished successfully.
    BuildSuccessful { build: BuildContext },
    /// Build finished with a failure.
    BuildFailed { build: BuildContext },
    /// Build could not be started at all.
    BuildFailedToStart { build: BuildContext },
    /// Build is still running but already has failures.
    BuildFailing { build: BuildContext },
    /// Build produced no output for longer than its hang threshold.
    BuildProbablyHanging { build: BuildContext },
    /// VCS labeling after the build failed.
    LabelingFailed {
        build_id: i64,
        #[serde(default)]
        vcs_root: Option<String>,
        #[serde(default)]
        cause: Option<String>,
    },
    ResponsibleChanged { target: ResponsibilityTarget },
    ResponsibleAssigned { target: ResponsibilityTarget },
    BuildProblemResponsibleAssigned { project_full_name: String },
    BuildProblemResponsibleChanged { project_full_name: String },
    /// Mute events may arrive without a project; those are not notified.
    TestsMuted {
        #[serde(default)]
        project: Option<ProjectRef>,
    },
    TestsUnmuted {
        #[serde(default)]
        project: Option<ProjectRef>,
    },
    BuildProblemsMuted {
        #[serde(default)]
        project: Option<ProjectRef>,
    },
    BuildProblemsUnmuted {
        #[serde(default)]
        project: Option<ProjectRef>,
    },
}

/// What a responsibility change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum ResponsibilityTarget {
    /// A whole build configuration.
    BuildType { full_name: String },
    /// A single investigated test, reported against its project.
    TestName { project_full_name: String },
    /// A group of tests in one project.
    Tests { project_full_name: String },
}

/// Project associated with a mute/unmute event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub full_name: String,
}

impl NotificationEvent {
    /// Stable variant name, used as a log field and metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BuildStarted { .. } => "BuildStarted",
            Self::BuildSuccessful { .. } => "BuildSuccessful",
            Self::BuildFailed { .. } => "BuildFailed",
            Self::BuildFailedToStart { .. } => "BuildFailedToStart",
            Self::BuildFailing { .. } => "BuildFailing",
            Self::BuildProbablyHanging { .. } => "BuildProbablyHanging",
            Self::LabelingFailed { .. } => "LabelingFailed",
            Self::ResponsibleChanged { .. } => "ResponsibleChanged",
            Self::ResponsibleAssigned { .. } => "ResponsibleAssigned",
            Self::BuildProblemResponsibleAssigned { .. } => "BuildProblemResponsibleAssigned",
            Self::BuildProblemResponsibleChanged { .. } => "BuildProblemResponsibleChanged",
            Self::TestsMuted { .. } => "TestsMuted",
            Self::TestsUnmuted { .. } => "TestsUnmuted",
            Self::BuildProblemsMuted { .. } => "BuildProblemsMuted",
            Self::BuildProblemsUnmuted { .. } => "BuildProblemsUnmuted",
        }
    }

    /// The build this event is about, for events that carry a full build.
    pub fn build(&self) -> Option<&BuildContext> {
        match self {
            Self::BuildStarted { build }
            | Self::BuildSuccessful { build }
            | Self::BuildFailed { build }
            | Self::BuildFailedToStart { build }
            | Self::BuildFailing { build }
            | Self::BuildProbablyHanging { build } => Some(build),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_tagged_build_event() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "type": "BuildFailed",
            "build": {
                "build_id": 7,
                "project_id": "proj1",
                "build_type_name": "Unit tests",
                "branch": { "name": "feature/x", "display_name": "feature/x" },
                "comment": "flaky test"
            }
        }))
        .unwrap();

        assert_eq!(event.kind(), "BuildFailed");
        let build = event.build().unwrap();
        assert_eq!(build.build_id, 7);
        assert_eq!(build.comment.as_deref(), Some("flaky test"));
    }

    #[test]
    fn mute_event_project_defaults_to_none() {
        let event: NotificationEvent =
            serde_json::from_value(json!({ "type": "TestsMuted" })).unwrap();
        assert_eq!(event, NotificationEvent::TestsMuted { project: None });
    }

    #[test]
    fn responsibility_target_uses_scope_tag() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "type": "ResponsibleAssigned",
            "target": { "scope": "build_type", "full_name": "Foo :: Compile" }
        }))
        .unwrap();

        assert_eq!(
            event,
            NotificationEvent::ResponsibleAssigned {
                target: ResponsibilityTarget::BuildType { full_name: "Foo :: Compile".into() }
            }
        );
        assert!(event.build().is_none());
    }
}
