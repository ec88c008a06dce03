// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, TestApp};
use axum::http::StatusCode;
use deckhooks::domain::models::webhook::WebhookEventType;
use deckhooks::domain::repositories::delivery_log_repository::DeliveryLogRepository;
use deckhooks::domain::repositories::webhook_repository::WebhookRepository;
use deckhooks::utils::signature::{self, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER_HEADER: &str = "x-owner-id";

async fn subscribe(app: &TestApp, owner: Uuid, url: String, events: Value) -> (Uuid, String) {
    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "url": url, "events": events }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body = response.json::<Value>();
    (
        body["id"].as_str().unwrap().parse().unwrap(),
        body["secret"].as_str().unwrap().to_string(),
    )
}

async fn publish(app: &TestApp, owner: Uuid, event: &str, data: Value) -> Value {
    let response = app
        .server
        .post("/internal/events")
        .json(&json!({ "ownerId": owner, "event": event, "data": data }))
        .await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_event_is_delivered_signed_to_subscriber() {
    let app = create_test_app().await;
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/deck-events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("thanks"))
        .expect(1)
        .mount(&mock)
        .await;

    let owner = Uuid::new_v4();
    let (id, secret) = subscribe(
        &app,
        owner,
        format!("{}/deck-events", mock.uri()),
        json!(["slide.reordered"]),
    )
    .await;

    let accepted = publish(&app, owner, "slide.reordered", json!({ "order": [3, 1, 2] })).await;
    assert_eq!(accepted["queued"], 1);

    let logs = app.wait_for_logs(id, 1).await;
    assert_eq!(logs.len(), 1);
    assert!(logs[0].success);
    assert_eq!(logs[0].status_code, Some(200));
    assert_eq!(logs[0].response_body.as_deref(), Some("thanks"));

    let requests = mock.received_requests().await.unwrap();
    let request = &requests[0];
    let header = request
        .headers
        .get(SIGNATURE_HEADER)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(signature::verify(&secret, &request.body, header));
    assert!(request.headers.get(TIMESTAMP_HEADER).is_some());

    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body["event"], "slide.reordered");
    assert_eq!(body["data"]["order"], json!([3, 1, 2]));
    assert_eq!(body["ownerId"], owner.to_string());

    let stored = app
        .webhooks
        .find_by_owner_and_id(owner, id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.failure_count, 0);
    assert!(stored.last_triggered_at.is_some());
}

#[tokio::test]
async fn test_failing_subscriber_does_not_affect_sibling() {
    let app = create_test_app().await;
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/healthy"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock)
        .await;

    let owner = Uuid::new_v4();
    let (healthy, _) = subscribe(
        &app,
        owner,
        format!("{}/healthy", mock.uri()),
        json!(["project.exported"]),
    )
    .await;
    let (broken, _) = subscribe(
        &app,
        owner,
        format!("{}/broken", mock.uri()),
        json!(["project.exported"]),
    )
    .await;

    let accepted = publish(&app, owner, "project.exported", json!({ "format": "pdf" })).await;
    assert_eq!(accepted["queued"], 2);

    let healthy_logs = app.wait_for_logs(healthy, 1).await;
    let broken_logs = app.wait_for_logs(broken, 3).await;
    assert_eq!(healthy_logs.len(), 1);
    assert!(healthy_logs[0].success);
    assert_eq!(broken_logs.len(), 3);
    assert!(broken_logs.iter().all(|l| !l.success && l.status_code == Some(503)));

    // The failure counter is written after the last attempt is logged
    let mut broken_state = None;
    for _ in 0..50 {
        let sub = app
            .webhooks
            .find_by_owner_and_id(owner, broken)
            .await
            .unwrap()
            .unwrap();
        if sub.failure_count == 1 {
            broken_state = Some(sub);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    let broken_state = broken_state.expect("failure was never recorded");
    assert!(broken_state.active);

    let healthy_state = app
        .webhooks
        .find_by_owner_and_id(owner, healthy)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(healthy_state.failure_count, 0);

    // Logs endpoint shows newest first and honours the limit
    let logs = app
        .server
        .get(&format!("/integrations/webhooks/{broken}/logs"))
        .add_query_param("limit", 2)
        .add_header(OWNER_HEADER, owner.to_string())
        .await;
    assert_eq!(logs.status_code(), StatusCode::OK);
    let logs = logs.json::<Vec<Value>>();
    assert_eq!(logs.len(), 2);
    let created_at = |log: &Value| {
        chrono::DateTime::parse_from_rfc3339(log["createdAt"].as_str().unwrap()).unwrap()
    };
    assert!(created_at(&logs[0]) >= created_at(&logs[1]));
}

#[tokio::test]
async fn test_only_active_matching_subscriptions_are_queued() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let other_owner = Uuid::new_v4();
    let url = "http://127.0.0.1:9/unused".to_string();

    let (_matching, _) = subscribe(&app, owner, url.clone(), json!(["block.created"])).await;
    let (paused, _) = subscribe(&app, owner, url.clone(), json!(["block.created"])).await;
    subscribe(&app, owner, url.clone(), json!(["block.deleted"])).await;
    subscribe(&app, other_owner, url, json!(["block.created"])).await;

    let response = app
        .server
        .patch(&format!("/integrations/webhooks/{paused}"))
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "active": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let queued = app
        .trigger
        .trigger(owner, WebhookEventType::BlockCreated, json!({}), None)
        .await
        .unwrap();
    assert_eq!(queued, 1);

    let accepted = publish(&app, Uuid::new_v4(), "block.created", json!({})).await;
    assert_eq!(accepted["queued"], 0);
}

#[tokio::test]
async fn test_unknown_event_is_rejected() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/internal/events")
        .json(&json!({ "ownerId": Uuid::new_v4(), "event": "deck.exploded", "data": {} }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["invalidEvents"], json!(["deck.exploded"]));
}

#[tokio::test]
async fn test_shutdown_drains_queued_deliveries() {
    let app = create_test_app().await;
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;

    let owner = Uuid::new_v4();
    let (id, _) = subscribe(
        &app,
        owner,
        format!("{}/hook", mock.uri()),
        json!(["collaborator.added"]),
    )
    .await;
    for _ in 0..5 {
        app.trigger
            .trigger(owner, WebhookEventType::CollaboratorAdded, json!({}), None)
            .await
            .unwrap();
    }

    let TestApp {
        server,
        trigger,
        logs,
        worker_manager,
        ..
    } = app;
    // Release every queue sender so the worker can finish
    drop(server);
    drop(trigger);
    worker_manager
        .shutdown(std::time::Duration::from_secs(5))
        .await;

    let entries = logs.list_by_webhook(id, 50).await.unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|e| e.success));
}
