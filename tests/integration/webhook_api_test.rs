// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{create_test_app, TestApp};
use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER_HEADER: &str = "x-owner-id";

async fn create_webhook(app: &TestApp, owner: Uuid, body: Value) -> Value {
    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

#[tokio::test]
async fn test_list_supported_events() {
    let app = create_test_app().await;

    let response = app.server.get("/integrations/webhooks/events").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let events = response.json::<Vec<String>>();
    assert_eq!(events.len(), 18);
    assert_eq!(events[0], "project.created");
    assert!(events.contains(&"ai.generation.failed".to_string()));
    assert!(!events.contains(&"webhook.test".to_string()));
}

#[tokio::test]
async fn test_create_returns_full_record_with_secret() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();

    let created = create_webhook(
        &app,
        owner,
        json!({
            "url": "https://hooks.example.com/deck",
            "events": ["project.created", "slide.updated", "project.created"]
        }),
    )
    .await;

    assert_eq!(created["url"], "https://hooks.example.com/deck");
    assert_eq!(created["events"], json!(["project.created", "slide.updated"]));
    assert_eq!(created["active"], true);
    assert_eq!(created["failureCount"], 0);
    assert_eq!(created["ownerId"], owner.to_string());
    assert_eq!(created["secret"].as_str().unwrap().len(), 64);
    assert!(created["lastTriggeredAt"].is_null());
}

#[tokio::test]
async fn test_create_rejects_unsupported_events() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();

    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({
            "url": "https://hooks.example.com/deck",
            "events": ["project.created", "deck.exploded", "deck.exploded", "webhook.test"]
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["invalidEvents"], json!(["deck.exploded", "webhook.test"]));
    assert!(body["error"].as_str().unwrap().contains("deck.exploded"));

    // Nothing was persisted
    let list = app
        .server
        .get("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .await;
    assert_eq!(list.json::<Vec<Value>>().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_bad_url_and_malformed_body() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();

    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "url": "ftp://files.example.com", "events": ["project.created"] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "url": "https://hooks.example.com/deck" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({
            "url": "https://hooks.example.com/deck",
            "events": ["project.created"],
            "secret": ""
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_omits_secrets_and_get_includes_them() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let created = create_webhook(
        &app,
        owner,
        json!({
            "url": "https://hooks.example.com/deck",
            "events": ["comment.created"],
            "secret": "shared-secret"
        }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let list = app
        .server
        .get("/integrations/webhooks")
        .add_header(OWNER_HEADER, owner.to_string())
        .await
        .json::<Vec<Value>>();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], id);
    assert!(list[0].get("secret").is_none());

    let fetched = app
        .server
        .get(&format!("/integrations/webhooks/{id}"))
        .add_header(OWNER_HEADER, owner.to_string())
        .await;
    assert_eq!(fetched.status_code(), StatusCode::OK);
    assert_eq!(fetched.json::<Value>()["secret"], "shared-secret");
}

#[tokio::test]
async fn test_other_owner_gets_not_found() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let created = create_webhook(
        &app,
        owner,
        json!({ "url": "https://hooks.example.com/deck", "events": ["project.deleted"] }),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/integrations/webhooks/{id}");

    let get = app
        .server
        .get(&path)
        .add_header(OWNER_HEADER, intruder.to_string())
        .await;
    assert_eq!(get.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(get.json::<Value>()["error"], "Webhook not found");

    let patch = app
        .server
        .patch(&path)
        .add_header(OWNER_HEADER, intruder.to_string())
        .json(&json!({ "active": false }))
        .await;
    assert_eq!(patch.status_code(), StatusCode::NOT_FOUND);

    let invalid_patch = app
        .server
        .patch(&path)
        .add_header(OWNER_HEADER, intruder.to_string())
        .json(&json!({ "url": "not a url", "events": ["slide.exploded"] }))
        .await;
    assert_eq!(invalid_patch.status_code(), StatusCode::NOT_FOUND);

    let delete = app
        .server
        .delete(&path)
        .add_header(OWNER_HEADER, intruder.to_string())
        .await;
    assert_eq!(delete.status_code(), StatusCode::NOT_FOUND);

    let test = app
        .server
        .post(&format!("{path}/test"))
        .add_header(OWNER_HEADER, intruder.to_string())
        .await;
    assert_eq!(test.status_code(), StatusCode::NOT_FOUND);

    let logs = app
        .server
        .get(&format!("{path}/logs"))
        .add_header(OWNER_HEADER, intruder.to_string())
        .await;
    assert_eq!(logs.status_code(), StatusCode::NOT_FOUND);

    let list = app
        .server
        .get("/integrations/webhooks")
        .add_header(OWNER_HEADER, intruder.to_string())
        .await;
    assert!(list.json::<Vec<Value>>().is_empty());

    // The owner's subscription is intact
    let owned = app
        .server
        .get(&path)
        .add_header(OWNER_HEADER, owner.to_string())
        .await
        .json::<Value>();
    assert_eq!(owned["active"], true);
}

#[tokio::test]
async fn test_patch_updates_supplied_fields() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let created = create_webhook(
        &app,
        owner,
        json!({ "url": "https://hooks.example.com/deck", "events": ["project.created"] }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/integrations/webhooks/{id}"))
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "url": "https://hooks.example.com/v2", "active": false }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let updated = response.json::<Value>();
    assert_eq!(updated["url"], "https://hooks.example.com/v2");
    assert_eq!(updated["active"], false);
    assert_eq!(updated["events"], json!(["project.created"]));
    assert_eq!(updated["secret"], created["secret"]);

    let rejected = app
        .server
        .patch(&format!("/integrations/webhooks/{id}"))
        .add_header(OWNER_HEADER, owner.to_string())
        .json(&json!({ "events": ["slide.melted"] }))
        .await;
    assert_eq!(rejected.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(rejected.json::<Value>()["invalidEvents"], json!(["slide.melted"]));
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let app = create_test_app().await;
    let owner = Uuid::new_v4();
    let created = create_webhook(
        &app,
        owner,
        json!({ "url": "https://hooks.example.com/deck", "events": ["project.created"] }),
    )
    .await;
    let path = format!("/integrations/webhooks/{}", created["id"].as_str().unwrap());

    let response = app
        .server
        .delete(&path)
        .add_header(OWNER_HEADER, owner.to_string())
        .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = app
        .server
        .get(&path)
        .add_header(OWNER_HEADER, owner.to_string())
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_test_endpoint_reports_result_without_side_effects() {
    let app = create_test_app().await;
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock)
        .await;

    let owner = Uuid::new_v4();
    let created = create_webhook(
        &app,
        owner,
        json!({ "url": format!("{}/hook", mock.uri()), "events": ["project.created"] }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/integrations/webhooks/{id}/test"))
        .add_header(OWNER_HEADER, owner.to_string())
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let result = response.json::<Value>();
    assert_eq!(result["success"], false);
    assert_eq!(result["statusCode"], 500);
    assert_eq!(result["response"], "boom");

    let received = mock.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["event"], "webhook.test");

    let after = app
        .server
        .get(&format!("/integrations/webhooks/{id}"))
        .add_header(OWNER_HEADER, owner.to_string())
        .await
        .json::<Value>();
    assert_eq!(after["failureCount"], 0);
    assert_eq!(after["active"], true);

    let logs = app
        .server
        .get(&format!("/integrations/webhooks/{id}/logs"))
        .add_header(OWNER_HEADER, owner.to_string())
        .await
        .json::<Vec<Value>>();
    assert!(logs.is_empty());
}
