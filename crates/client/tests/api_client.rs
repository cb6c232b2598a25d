//! Integration tests that run `ApiClient` against a local axum server
//! standing in for the admin backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use ips_client::{AlertQuery, AlertsService, ApiClient, ClientError, SyscallsService, TestTriggerService};
use ips_rules::{RuleDocument, RuleDocumentEditor, RulesService, ServiceError};

#[derive(Default)]
struct Recorded {
    put_body: Option<Value>,
    alert_params: Option<HashMap<String, String>>,
    trigger_body: Option<Value>,
}

type Shared = Arc<Mutex<Recorded>>;

/// Bind an ephemeral port, serve `router`, and return the server URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn backend(shared: Shared) -> Router {
    let api = Router::new()
        .route(
            "/rules",
            get(|| async {
                Json(json!({
                    "ruleset_version": "1.0.0",
                    "description": "baseline",
                    "rules": [{
                        "rule_id": "RULE_A01",
                        "description": "critical write",
                        "conditions": [
                            { "field": "syscall_name", "operator": "equals", "value": "openat" }
                        ]
                    }]
                }))
            })
            .put(|State(shared): State<Shared>, Json(body): Json<Value>| async move {
                shared.lock().unwrap().put_body = Some(body);
                Json(json!({
                    "status": "success",
                    "message": "Rule.yaml ConfigMap updated successfully.",
                    "new_version": "1.0.1"
                }))
            }),
        )
        .route(
            "/alerts",
            get(
                |State(shared): State<Shared>, Query(params): Query<HashMap<String, String>>| async move {
                    shared.lock().unwrap().alert_params = Some(params);
                    Json(json!({
                        "alerts": [{
                            "alert_id": "alert-7",
                            "timestamp": "2024-05-01T12:00:00Z",
                            "rule_id": "RULE_A01",
                            "rule_description": "critical write",
                            "severity": "high",
                            "pod_name": "nginx-7d9",
                            "namespace": "default",
                            "syscall_log": { "syscall": "openat", "pid": 4242 }
                        }]
                    }))
                },
            ),
        )
        .route(
            "/syscalls",
            get(|| async {
                Json(json!({
                    "total_count": 2,
                    "syscalls": [
                        { "name": "openat", "args": [{ "type": "int", "name": "dfd" }] },
                        { "name": "execve", "args": [] }
                    ]
                }))
            }),
        )
        .route(
            "/tests/trigger",
            post(|State(shared): State<Shared>, Json(body): Json<Value>| async move {
                shared.lock().unwrap().trigger_body = Some(body);
                Json(json!({ "status": "created", "job_name": "test-attack-x1y2" }))
            }),
        )
        .with_state(shared);

    Router::new().nest("/api/v1", api)
}

fn failing_backend() -> Router {
    Router::new()
        .route(
            "/api/v1/rules",
            get(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }).put(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "failed to update ConfigMap" })),
                )
            }),
        )
        .route("/api/v1/syscalls", get(|| async { "not json" }))
}

#[tokio::test]
async fn fetch_and_save_rules() {
    let shared = Shared::default();
    let client = ApiClient::new(&serve(backend(shared.clone())).await);

    let doc = RulesService::fetch(&client).await.unwrap();
    assert_eq!(doc.ruleset_version, "1.0.0");
    assert_eq!(doc.rule_ids(), vec!["RULE_A01"]);

    let resp = RulesService::save(&client, &RuleDocument::new("1.0.0")).await.unwrap();
    assert_eq!(resp.new_version.as_deref(), Some("1.0.1"));

    let put = shared.lock().unwrap().put_body.clone().unwrap();
    assert_eq!(put, json!({ "ruleset_version": "1.0.0", "description": "", "rules": [] }));
}

#[tokio::test]
async fn alerts_send_limit_and_since() {
    let shared = Shared::default();
    let client = ApiClient::new(&serve(backend(shared.clone())).await);

    let query = AlertQuery {
        limit: 25,
        since: Some("2024-05-01T00:00:00Z".parse().unwrap()),
    };
    let alerts = client.alerts(&query).await.unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].pod_name, "nginx-7d9");
    assert_eq!(alerts[0].syscall_log.as_ref().unwrap()["pid"], 4242);

    let params = shared.lock().unwrap().alert_params.clone().unwrap();
    assert_eq!(params.get("limit").map(String::as_str), Some("25"));
    assert_eq!(params.get("since").map(String::as_str), Some("2024-05-01T00:00:00Z"));
}

#[tokio::test]
async fn alerts_omit_since_when_unset() {
    let shared = Shared::default();
    let client = ApiClient::new(&serve(backend(shared.clone())).await);

    client.alerts(&AlertQuery::default()).await.unwrap();
    let params = shared.lock().unwrap().alert_params.clone().unwrap();
    assert_eq!(params.get("limit").map(String::as_str), Some("50"));
    assert!(!params.contains_key("since"));
}

#[tokio::test]
async fn syscalls_and_trigger() {
    let shared = Shared::default();
    let client = ApiClient::new(&serve(backend(shared.clone())).await);

    let syscalls = client.syscalls().await.unwrap();
    assert_eq!(syscalls.len(), 2);
    assert_eq!(syscalls[0].args[0].arg_type, "int");

    let job = client.trigger_test("RULE_A01").await.unwrap();
    assert_eq!(job.job_name, "test-attack-x1y2");
    let body = shared.lock().unwrap().trigger_body.clone().unwrap();
    assert_eq!(body, json!({ "test_type": "RULE_A01" }));
}

#[tokio::test]
async fn error_responses_are_classified() {
    let client = ApiClient::new(&serve(failing_backend()).await);

    match RulesService::save(&client, &RuleDocument::new("v1")).await {
        Err(ServiceError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "failed to update ConfigMap");
        }
        other => panic!("unexpected {other:?}"),
    }

    match client.get_rules().await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "server returned 502: upstream down");
        }
        other => panic!("unexpected {other:?}"),
    }

    assert!(matches!(client.syscalls().await, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ApiClient::new(&url);
    assert!(matches!(
        RulesService::fetch(&client).await,
        Err(ServiceError::Transport(_))
    ));
}

#[tokio::test]
async fn editor_round_trip_over_http() {
    let shared = Shared::default();
    let client = Arc::new(ApiClient::new(&serve(backend(shared.clone())).await));
    let mut editor = RuleDocumentEditor::new(client);

    editor.load().await.unwrap();
    editor.add_rule().unwrap();
    let version = editor.save().await.unwrap();
    assert_eq!(version.as_deref(), Some("1.0.1"));

    let put = shared.lock().unwrap().put_body.clone().unwrap();
    assert_eq!(put["rules"].as_array().unwrap().len(), 2);
    assert_eq!(put["rules"][1]["conditions"][0]["value"], "openat");
}
