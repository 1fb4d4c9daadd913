//! Event dispatcher: maps each event to one message and fans it out to the
//! recipients' webhooks.
//!
//! Recipients are handled one after another. A recipient without a usable
//! webhook, or whose webhook fails, is recorded in the report and skipped;
//! the rest of the batch is still delivered. Recipients with no settings at
//! all are skipped without being recorded.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::error::DeliveryError;
use crate::events::{NotificationEvent, ProjectRef, ResponsibilityTarget};
use crate::models::destination::RecipientId;
use crate::models::message::{EmbedColor, NotificationMessage};
use crate::ports::{ProjectRegistry, UserConfigResolver};
use crate::services::payload_service;
use crate::services::webhook_client::{DeliveryOutcome, WebhookClient};

/// Delivery result for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    pub recipient: RecipientId,
    pub outcome: DeliveryOutcome,
}

/// Everything that happened while handling one event.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub dispatch_id: Uuid,
    pub event_kind: &'static str,
    /// One entry per resolved recipient; empty when the event produced no
    /// message.
    pub outcomes: Vec<RecipientOutcome>,
    pub skipped: bool,
}

impl DispatchReport {
    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.outcome.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.delivered()
    }
}

/// Turns CI events into webhook notifications.
#[derive(Clone)]
pub struct NotificationDispatcher {
    projects: Arc<dyn ProjectRegistry>,
    users: Arc<dyn UserConfigResolver>,
    client: WebhookClient,
}

impl NotificationDispatcher {
    pub fn new(
        projects: Arc<dyn ProjectRegistry>,
        users: Arc<dyn UserConfigResolver>,
        client: WebhookClient,
    ) -> Self {
        Self { projects, users, client }
    }

    /// Handle one event for a set of recipients. Never fails; the report
    /// says what was delivered.
    pub async fn handle(
        &self,
        event: NotificationEvent,
        recipients: &BTreeSet<RecipientId>,
    ) -> DispatchReport {
        let dispatch_id = Uuid::new_v4();
        let event_kind = event.kind();
        let span = info_span!("dispatch", %dispatch_id, event = event_kind);

        async move {
            crate::metrics::event_received(event_kind);

            let Some(message) = self.compose(&event) else {
                tracing::debug!("Event has no associated project, not notifying");
                crate::metrics::event_skipped(event_kind);
                return DispatchReport { dispatch_id, event_kind, outcomes: Vec::new(), skipped: true };
            };

            if let NotificationEvent::LabelingFailed { cause: Some(cause), .. } = &event {
                tracing::debug!(cause = %cause, "Labeling failure cause");
            }

            let mut outcomes = Vec::with_capacity(recipients.len());
            for recipient in recipients {
                if let Some(outcome) = self.notify(&message, recipient).await {
                    outcomes.push(RecipientOutcome { recipient: recipient.clone(), outcome });
                }
            }

            let report = DispatchReport { dispatch_id, event_kind, outcomes, skipped: false };
            tracing::info!(
                recipients = recipients.len(),
                delivered = report.delivered(),
                failed = report.failed(),
                "Notification dispatched"
            );
            report
        }
        .instrument(span)
        .await
    }

    /// Deliver to one recipient. `None` when the recipient has no settings at
    /// all; such recipients are not notified and not reported.
    async fn notify(&self, message: &NotificationMessage, recipient: &RecipientId) -> Option<DeliveryOutcome> {
        let Some(destination) = self.users.resolve(recipient) else {
            tracing::debug!(recipient = %recipient, "No settings for recipient, skipping");
            return None;
        };

        let outcome = self.client.deliver(message, &destination).await;
        match &outcome {
            DeliveryOutcome::Delivered { status_code } => {
                tracing::info!(recipient = %recipient, status = status_code, "Webhook delivered");
            }
            DeliveryOutcome::Failed(e @ DeliveryError::ConfigurationError { .. }) => {
                tracing::error!(recipient = %recipient, "Webhook URL not set, can't execute the webhook: {e}");
            }
            DeliveryOutcome::Failed(e) => {
                tracing::warn!(recipient = %recipient, category = %e.category(), "Failed to send the webhook: {e}");
            }
        }
        Some(outcome)
    }

    /// Build the message for an event, or `None` for mute events that have
    /// no associated project.
    pub fn compose(&self, event: &NotificationEvent) -> Option<NotificationMessage> {
        use NotificationEvent as E;

        let build_message = |title: &str, description: String, color: EmbedColor| {
            let fields = event
                .build()
                .map(|build| payload_service::build_context_fields(build, self.projects.as_ref()))
                .unwrap_or_default();
            NotificationMessage::new(title, description, color).with_fields(fields)
        };

        let message = match event {
            E::BuildStarted { build } => build_message(
                "Build started",
                format!("The build with the ID {} has started!", build.build_id),
                EmbedColor::Blue,
            ),
            E::BuildSuccessful { build } => build_message(
                "Build successful",
                format!("The build with the ID {} was successful!", build.build_id),
                EmbedColor::Green,
            ),
            E::BuildFailed { build } => build_message(
                "Build failed",
                format!("The build with the ID {} has failed!", build.build_id),
                EmbedColor::Red,
            ),
            E::BuildFailedToStart { build } => build_message(
                "Build failed to start",
                format!("The build with the ID {} failed to start!", build.build_id),
                EmbedColor::Red,
            ),
            E::BuildFailing { build } => build_message(
                "Build is failing",
                format!("The build with the ID {} is failing!", build.build_id),
                EmbedColor::Red,
            ),
            E::BuildProbablyHanging { build } => build_message(
                "Build is probably hanging",
                format!("The build with the ID {} is probably hanging!", build.build_id),
                EmbedColor::Orange,
            ),
            E::LabelingFailed { build_id, .. } => NotificationMessage::new(
                "Labeling failed",
                format!("Labeling of build with the ID {build_id} has failed!"),
                EmbedColor::Red,
            ),
            E::ResponsibleChanged { target } => {
                let (title, description) = match target {
                    ResponsibilityTarget::BuildType { full_name } => (
                        "Responsibility for build type has changed",
                        format!("The responsibility for the build type {full_name} has changed!"),
                    ),
                    ResponsibilityTarget::TestName { project_full_name } => (
                        "Responsibility changed",
                        format!("Responsibility for the project {project_full_name} has changed!"),
                    ),
                    ResponsibilityTarget::Tests { project_full_name } => (
                        "Responsibility changed",
                        format!("Responsibility for project {project_full_name} has been changed!"),
                    ),
                };
                NotificationMessage::new(title, description, EmbedColor::Orange)
            }
            E::ResponsibleAssigned { target } => {
                let description = match target {
                    ResponsibilityTarget::BuildType { full_name } => {
                        format!("Responsibility for build type {full_name} has been assigned!")
                    }
                    ResponsibilityTarget::TestName { project_full_name } => {
                        format!("Responsibility for project {project_full_name} has been assigned!")
                    }
                    ResponsibilityTarget::Tests { project_full_name } => format!(
                        "Responsibility for one or more tests of project {project_full_name} have been assigned!"
                    ),
                };
                NotificationMessage::new("Responsibility assigned", description, EmbedColor::Orange)
            }
            E::BuildProblemResponsibleAssigned { project_full_name } => NotificationMessage::new(
                "Responsibility assigned",
                format!(
                    "Responsibility for one or more build problems of project {project_full_name} have been assigned!"
                ),
                EmbedColor::Orange,
            ),
            E::BuildProblemResponsibleChanged { project_full_name } => NotificationMessage::new(
                "Responsibility changed",
                format!(
                    "Responsibility for one or more build problems of project {project_full_name} has been changed!"
                ),
                EmbedColor::Orange,
            ),
            E::TestsMuted { project } => mute_message(project.as_ref()?, "Tests muted", "tests", "muted"),
            E::TestsUnmuted { project } => {
                mute_message(project.as_ref()?, "Tests unmuted", "tests", "unmuted")
            }
            E::BuildProblemsMuted { project } => {
                mute_message(project.as_ref()?, "Build problems muted", "build problems", "muted")
            }
            E::BuildProblemsUnmuted { project } => {
                mute_message(project.as_ref()?, "Build problems unmuted", "build problems", "unmuted")
            }
        };

        Some(message)
    }
}

fn mute_message(project: &ProjectRef, title: &str, subject: &str, action: &str) -> NotificationMessage {
    NotificationMessage::new(
        title,
        format!("One or more {subject} of the project {} have been {action}!", project.full_name),
        EmbedColor::Orange,
    )
}
