//! End-to-end dispatch tests against a mock webhook endpoint.
//!
//! Each test builds a dispatcher over in-memory registries and checks both the
//! per-recipient report and what the endpoint actually received.

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use ci_notify::{
    Branch, BuildContext, ClientConfig, DeliveryError, DeliveryOutcome, Destination, ErrorCategory,
    NotificationDispatcher, NotificationEvent, ProjectRef, RecipientId, WebhookClient,
};
use serde_json::{json, Value};
use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

fn dispatcher(users: HashMap<RecipientId, Destination>) -> NotificationDispatcher {
    let projects: HashMap<String, String> = HashMap::from([("proj1".to_string(), "Foo".to_string())]);
    let client = WebhookClient::new(ClientConfig { timeout: Duration::from_secs(2), ..Default::default() })
        .unwrap();
    NotificationDispatcher::new(Arc::new(projects), Arc::new(users), client)
}

fn recipients(ids: &[&str]) -> BTreeSet<RecipientId> {
    ids.iter().map(|id| RecipientId::from(*id)).collect()
}

async fn accept_all(server: &MockServer, expected: u64) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/hook"))
        .respond_with(ResponseTemplate::new(204))
        .expect(expected)
        .mount(server)
        .await;
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| serde_json::from_slice(&request.body).unwrap())
        .collect()
}

#[tokio::test]
async fn build_started_on_default_branch() {
    let server = MockServer::start().await;
    accept_all(&server, 1).await;

    let users = HashMap::from([(RecipientId::from("alice"), Destination::new(format!("{}/hook", server.uri())))]);
    let event = NotificationEvent::BuildStarted {
        build: BuildContext {
            build_id: 42,
            project_id: "proj1".to_string(),
            build_type_name: "Compile".to_string(),
            branch: Some(Branch::new(Branch::DEFAULT_BRANCH_NAME, "main")),
            comment: None,
        },
    };

    let report = dispatcher(users).handle(event, &recipients(&["alice"])).await;
    assert_eq!(report.event_kind, "BuildStarted");
    assert_eq!(report.delivered(), 1);

    let bodies = received_bodies(&server).await;
    assert_eq!(
        bodies[0],
        json!({
            "embeds": [{
                "title": "Build started",
                "description": "The build with the ID 42 has started!",
                "color": 0x3498DB,
                "fields": [
                    { "name": "Project", "value": "Foo", "inline": true },
                    { "name": "Build", "value": "Compile", "inline": true },
                    { "name": "Branch", "value": "Default", "inline": true }
                ]
            }]
        })
    );
}

#[tokio::test]
async fn build_failed_on_feature_branch_with_comment() {
    let server = MockServer::start().await;
    accept_all(&server, 1).await;

    let users = HashMap::from([(RecipientId::from("alice"), Destination::new(format!("{}/hook", server.uri())))]);
    let event = NotificationEvent::BuildFailed {
        build: BuildContext {
            build_id: 43,
            project_id: "proj1".to_string(),
            build_type_name: "Unit tests".to_string(),
            branch: Some(Branch::new("refs/heads/feature/x", "feature/x")),
            comment: Some("flaky test".to_string()),
        },
    };

    dispatcher(users).handle(event, &recipients(&["alice"])).await;

    let bodies = received_bodies(&server).await;
    let embed = &bodies[0]["embeds"][0];
    assert_eq!(embed["title"], "Build failed");
    assert_eq!(embed["color"], 0xE74C3C);
    assert_eq!(embed["fields"][2], json!({ "name": "Branch", "value": "feature/x", "inline": true }));
    assert_eq!(embed["fields"][3], json!({ "name": "Comment", "value": "flaky test", "inline": false }));
}

#[tokio::test]
async fn empty_url_does_not_block_later_recipients() {
    let server = MockServer::start().await;
    accept_all(&server, 1).await;

    let users = HashMap::from([
        (RecipientId::from("alice"), Destination::new("")),
        (RecipientId::from("bob"), Destination::new(format!("{}/hook", server.uri()))),
    ]);
    let event = NotificationEvent::BuildSuccessful {
        build: BuildContext {
            build_id: 1,
            project_id: "proj1".to_string(),
            build_type_name: "Compile".to_string(),
            branch: None,
            comment: None,
        },
    };

    let report = dispatcher(users).handle(event, &recipients(&["alice", "bob"])).await;

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].recipient, RecipientId::from("alice"));
    let error = report.outcomes[0].outcome.error().unwrap();
    assert_eq!(error.category(), ErrorCategory::Configuration);
    assert_eq!(report.outcomes[1].outcome, DeliveryOutcome::Delivered { status_code: 204 });
}

#[tokio::test]
async fn transport_failure_does_not_block_later_recipients() {
    let failing = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&failing)
        .await;
    let healthy = MockServer::start().await;
    accept_all(&healthy, 2).await;

    let users = HashMap::from([
        (RecipientId::from("a-failing"), Destination::new(format!("{}/hook", failing.uri()))),
        (RecipientId::from("b-malformed"), Destination::new("not a url")),
        (RecipientId::from("c-healthy"), Destination::new(format!("{}/hook", healthy.uri()))),
        (RecipientId::from("d-healthy"), Destination::new(format!("{}/hook", healthy.uri()))),
    ]);
    let event = NotificationEvent::BuildProbablyHanging {
        build: BuildContext {
            build_id: 5,
            project_id: "missing".to_string(),
            build_type_name: "Deploy".to_string(),
            branch: None,
            comment: None,
        },
    };

    let report = dispatcher(users)
        .handle(event, &recipients(&["a-failing", "b-malformed", "c-healthy", "d-healthy"]))
        .await;

    assert_eq!(report.delivered(), 2);
    assert_eq!(report.failed(), 2);
    assert!(matches!(
        report.outcomes[0].outcome,
        DeliveryOutcome::Failed(DeliveryError::HttpStatus { status_code: 500, .. })
    ));
    assert!(matches!(report.outcomes[1].outcome, DeliveryOutcome::Failed(DeliveryError::InvalidUrl { .. })));
}

#[tokio::test]
async fn username_override_is_per_destination() {
    let server = MockServer::start().await;
    accept_all(&server, 2).await;

    let url = format!("{}/hook", server.uri());
    let users = HashMap::from([
        (RecipientId::from("alice"), Destination::new(url.clone()).with_display_name("Alice CI")),
        (RecipientId::from("bob"), Destination::new(url)),
    ]);
    let event = NotificationEvent::TestsMuted { project: Some(ProjectRef { full_name: "Foo".to_string() }) };

    dispatcher(users).handle(event, &recipients(&["alice", "bob"])).await;

    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 2);
    assert_eq!(bodies[0]["username"], "Alice CI");
    assert!(bodies[1].get("username").is_none());
    assert_eq!(bodies[1]["embeds"][0]["description"], "One or more tests of the project Foo have been muted!");
}

#[tokio::test]
async fn mute_without_project_sends_nothing() {
    let server = MockServer::start().await;
    accept_all(&server, 0).await;

    let users = HashMap::from([(RecipientId::from("alice"), Destination::new(format!("{}/hook", server.uri())))]);

    let report = dispatcher(users)
        .handle(NotificationEvent::BuildProblemsMuted { project: None }, &recipients(&["alice"]))
        .await;

    assert!(report.skipped);
    assert!(report.outcomes.is_empty());
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let users = HashMap::from([(RecipientId::from("alice"), Destination::new(server.uri()))]);
    let client = WebhookClient::new(ClientConfig { timeout: Duration::from_millis(200), ..Default::default() })
        .unwrap();
    let dispatcher = NotificationDispatcher::new(Arc::new(HashMap::<String, String>::new()), Arc::new(users), client);

    let report = dispatcher
        .handle(NotificationEvent::LabelingFailed { build_id: 9, vcs_root: None, cause: None }, &recipients(&["alice"]))
        .await;

    assert!(matches!(report.outcomes[0].outcome, DeliveryOutcome::Failed(DeliveryError::Timeout { .. })));
}
