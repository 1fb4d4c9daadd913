//! Event ingest: the CI server posts one event plus its recipients, we
//! dispatch it and answer with what happened per recipient.

use std::collections::BTreeSet;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use ci_notify::{DispatchReport, NotificationDispatcher, NotificationEvent, RecipientId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::NotifyConfig;
use crate::signature::{self, SIGNATURE_HEADER};

/// Request body for `POST /events`.
#[derive(Debug, Deserialize)]
pub struct EventEnvelope {
    pub event: NotificationEvent,
    #[serde(default)]
    pub recipients: Vec<RecipientId>,
}

#[derive(Debug, Serialize)]
pub struct DispatchSummary {
    pub dispatch_id: Uuid,
    pub event: &'static str,
    pub skipped: bool,
    pub delivered: usize,
    pub failed: usize,
    pub outcomes: Vec<OutcomeJson>,
}

#[derive(Debug, Serialize)]
pub struct OutcomeJson {
    pub recipient: RecipientId,
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DispatchReport> for DispatchSummary {
    fn from(report: DispatchReport) -> Self {
        Self {
            dispatch_id: report.dispatch_id,
            event: report.event_kind,
            skipped: report.skipped,
            delivered: report.delivered(),
            failed: report.failed(),
            outcomes: report
                .outcomes
                .into_iter()
                .map(|o| OutcomeJson {
                    delivered: o.outcome.is_delivered(),
                    error: o.outcome.error().map(ToString::to_string),
                    recipient: o.recipient,
                })
                .collect(),
        }
    }
}

/// Handle an incoming event. Only authentication and parsing can fail;
/// delivery problems are reported in the summary.
pub async fn handle_event(
    config: &NotifyConfig,
    dispatcher: &NotificationDispatcher,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<DispatchSummary, StatusCode> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !signature::validate_signature(&config.ingest_secret, &body, signature) {
        tracing::warn!("Event signature validation failed");
        return Err(StatusCode::UNAUTHORIZED);
    }

    let envelope: EventEnvelope = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejecting malformed event: {e}");
        StatusCode::BAD_REQUEST
    })?;

    crate::metrics::event_ingested(envelope.event.kind());

    let recipients: BTreeSet<RecipientId> = envelope.recipients.into_iter().collect();
    let report = dispatcher.handle(envelope.event, &recipients).await;

    Ok(report.into())
}
