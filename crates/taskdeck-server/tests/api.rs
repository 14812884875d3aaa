//! End-to-end tests for the task API, driven through the router without a
//! socket.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use taskdeck_core::SqliteTaskStore;
use taskdeck_server::{AppState, router};
use tower::ServiceExt;
use uuid::Uuid;

fn app() -> Router {
    let store = SqliteTaskStore::open_in_memory().expect("store");
    router(Arc::new(AppState {
        store: Arc::new(store),
    }))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("response")
}

async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("json body")
}

async fn create_task(app: &Router, title: &str, priority: &str, user_id: &str) -> Value {
    let response = send(
        app,
        json_request(
            "POST",
            "/tasks",
            json!({ "title": title, "priority": priority, "userId": user_id }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn create_returns_created_record() {
    let app = app();
    let task = create_task(&app, "Buy milk", "Medium", "u1").await;
    let object = task.as_object().expect("object");
    assert!(object.contains_key("id"));
    assert_eq!(object["title"], "Buy milk");
    assert_eq!(object["completed"], false);
    assert_eq!(object["priority"], "Medium");
    assert_eq!(object["userId"], "u1");
    assert!(object.contains_key("createdAt"));
    assert!(!object.contains_key("updatedAt"));
}

#[tokio::test]
async fn create_requires_user_id() {
    let app = app();
    let response = send(
        &app,
        json_request("POST", "/tasks", json!({ "title": "orphan" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "User ID is required" }));
}

#[tokio::test]
async fn create_rejects_unknown_priority() {
    let app = app();
    let response = send(
        &app,
        json_request(
            "POST",
            "/tasks",
            json!({ "title": "t", "priority": "urgent", "userId": "u1" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unknown priority: urgent");
}

#[tokio::test]
async fn create_defaults_priority_to_low() {
    let app = app();
    let response = send(
        &app,
        json_request("POST", "/tasks", json!({ "title": "t", "userId": "u1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["priority"], "Low");
}

#[tokio::test]
async fn list_requires_user_id() {
    let app = app();
    let response = send(&app, get("/tasks")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "User ID is required" }));
}

#[tokio::test]
async fn list_scopes_to_owner_and_priority() {
    let app = app();
    create_task(&app, "mine medium", "Medium", "u1").await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    create_task(&app, "mine high", "High", "u1").await;
    create_task(&app, "theirs", "High", "u2").await;

    let response = send(&app, get("/tasks?userId=u1&priority=High")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tasks = body.as_array().expect("array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "mine high");

    // Dropping the filter returns the same set plus other priorities,
    // newest first, still scoped to u1.
    let response = send(&app, get("/tasks?userId=u1")).await;
    let body = body_json(response).await;
    let tasks = body.as_array().expect("array");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "mine high");
    assert_eq!(tasks[1]["title"], "mine medium");
}

#[tokio::test]
async fn list_with_empty_priority_returns_everything() {
    let app = app();
    create_task(&app, "a", "Low", "u1").await;
    create_task(&app, "b", "High", "u1").await;

    let response = send(&app, get("/tasks?userId=u1&priority=")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().expect("array").len(), 2);
}

#[tokio::test]
async fn list_priority_mismatch_is_empty_array() {
    let app = app();
    create_task(&app, "Buy milk", "Medium", "u1").await;

    let response = send(&app, get("/tasks?userId=u1&priority=High")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let app = app();
    let task = create_task(&app, "original", "Low", "u1").await;
    let id = task["id"].as_str().expect("id");

    let response = send(
        &app,
        json_request("PUT", &format!("/tasks/{id}"), json!({ "completed": true })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["completed"], true);
    assert_eq!(body["priority"], "Low");
    assert_eq!(body["title"], "original");
    assert!(body.as_object().expect("object").contains_key("updatedAt"));

    // A title-only update must not revert the completion flag.
    let response = send(
        &app,
        json_request("PUT", &format!("/tasks/{id}"), json!({ "title": "renamed" })),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["title"], "renamed");
    assert_eq!(body["completed"], true);
    assert_eq!(body["priority"], "Low");
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = app();
    let response = send(
        &app,
        json_request(
            "PUT",
            &format!("/tasks/{}", Uuid::new_v4()),
            json!({ "title": "ghost" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Task not found" }));

    // A path id that is not a uuid identifies no record either.
    let response = send(
        &app,
        json_request("PUT", "/tasks/not-a-uuid", json!({ "title": "ghost" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_removes_task_and_is_idempotent() {
    let app = app();
    let task = create_task(&app, "doomed", "Low", "u1").await;
    let id = task["id"].as_str().expect("id").to_string();

    let delete = |id: String| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/tasks/{id}"))
            .body(Body::empty())
            .expect("request")
    };

    let response = send(&app, delete(id.clone())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(response).await.is_empty());

    let response = send(&app, get("/tasks?userId=u1")).await;
    assert_eq!(body_json(response).await, json!([]));

    // Deleting again, or deleting garbage, is still a success.
    let response = send(&app, delete(id)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&app, delete("not-a-uuid".to_string())).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unmatched_route_is_plain_text_404() {
    let app = app();
    let response = send(&app, get("/nope")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = body_bytes(response).await;
    assert_eq!(String::from_utf8(bytes).expect("utf8"), "Route not found");
}

#[tokio::test]
async fn api_prefix_serves_the_same_routes() {
    let app = app();
    let response = send(
        &app,
        json_request(
            "POST",
            "/api/tasks",
            json!({ "title": "via prefix", "userId": "u1" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, get("/api/tasks?userId=u1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let tasks = body.as_array().expect("array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "via prefix");
}
