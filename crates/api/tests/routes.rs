//! HTTP route tests against an in-memory database.

use std::sync::Arc;

use api::{router, AppState};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use database::Database;
use http_body_util::BodyExt;
use intake::{ChatOrchestrator, DatabaseComplaintSink, DatabaseDirectory, TextClassifier};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();

    let chat = ChatOrchestrator::new(
        TextClassifier::keyword_only(),
        Arc::new(DatabaseComplaintSink::new(db.clone())),
    )
    .with_directory(Arc::new(DatabaseDirectory::new(db.clone())));

    router().with_state(AppState::new(db, chat))
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn complaint_body(department: &str) -> Value {
    json!({
        "description": "Streetlight on 5th cross has been off for a week",
        "department_code": department,
        "category": "Street Lighting",
        "metadata": { "phone": "9876543210" }
    })
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_chat_files_complaint() {
    let app = test_app().await;
    let turns = [
        "There is a huge pile of garbage rotting near my house",
        "9876543210",
        "MG Road, Blr",
    ];
    for text in turns {
        let (status, body) = call(
            &app,
            Method::POST,
            "/chat",
            Some(json!({ "session_id": "web-1", "user_input": text })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_ready"], false);
    }

    let (status, body) = call(
        &app,
        Method::POST,
        "/chat",
        Some(json!({ "session_id": "web-1", "user_input": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_ready"], true);
    let reference = body["backend_reference"].as_str().unwrap().to_string();
    assert!(reference.starts_with("COMP-"));

    let (status, stored) = call(&app, Method::GET, &format!("/complaints/{}", reference), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["department_code"], "BBMP");
    assert_eq!(stored["source"], "chatbot");
    assert_eq!(stored["metadata"]["location"], "MG Road, Blr");
}

#[tokio::test]
async fn test_chat_requires_session_id() {
    let app = test_app().await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/chat",
        Some(json!({ "session_id": "  ", "user_input": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("session_id"));
}

#[tokio::test]
async fn test_complaint_lifecycle() {
    let app = test_app().await;

    let (status, created) = call(&app, Method::POST, "/complaints", Some(complaint_body("ED"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "new");
    assert_eq!(created["source"], "web");
    assert_eq!(created["title"], "Streetlight on 5th cross has been off for a week");
    assert_eq!(created["metadata"]["phone"], "9876543210");
    let reference = created["reference_number"].as_str().unwrap().to_string();

    let uri = format!("/complaints/{}/status", reference);
    let (status, updated) = call(&app, Method::PATCH, &uri, Some(json!({ "status": "in progress" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");

    let (status, _) = call(&app, Method::PATCH, &uri, Some(json!({ "status": "closed" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = call(&app, Method::PATCH, &uri, Some(json!({ "status": "new" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, _) = call(&app, Method::PATCH, &uri, Some(json!({ "status": "lost" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_complaint_errors() {
    let app = test_app().await;

    let (status, body) = call(&app, Method::POST, "/complaints", Some(complaint_body("NOPE"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("NOPE"));

    let mut blank = complaint_body("ED");
    blank["description"] = json!("   ");
    let (status, _) = call(&app, Method::POST, "/complaints", Some(blank)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::GET, "/complaints/COMP-000000", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_complaints_filters_and_pages() {
    let app = test_app().await;
    for department in ["ED", "ED", "BBMP"] {
        let (status, _) = call(&app, Method::POST, "/complaints", Some(complaint_body(department))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = call(&app, Method::GET, "/complaints", None).await;
    let all = all.as_array().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0]["department_code"], "BBMP");

    let (_, page) = call(&app, Method::GET, "/complaints?limit=1&offset=1", None).await;
    assert_eq!(page.as_array().unwrap().len(), 1);

    let reference = all[0]["reference_number"].as_str().unwrap();
    let uri = format!("/complaints/{}/status", reference);
    call(&app, Method::PATCH, &uri, Some(json!({ "status": "resolved" }))).await;

    let (_, resolved) = call(&app, Method::GET, "/complaints?status=resolved", None).await;
    let resolved = resolved.as_array().unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0]["reference_number"], reference);

    let (status, _) = call(&app, Method::GET, "/complaints?status=unknown", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_departments() {
    let app = test_app().await;

    let (status, seeded) = call(&app, Method::GET, "/departments", None).await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = seeded
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"BBMP"));
    assert!(codes.contains(&"PW-SUB"));

    let (status, created) = call(
        &app,
        Method::POST,
        "/departments",
        Some(json!({ "code": "pw-roads", "name": "Roads Division", "parent_code": "PW" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["code"], "PW-ROADS");
    assert_eq!(created["parent_code"], "PW");

    let (status, _) = call(
        &app,
        Method::POST,
        "/departments",
        Some(json!({ "code": "PW-ROADS", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(
        &app,
        Method::POST,
        "/departments",
        Some(json!({ "code": "X1", "name": "Orphan", "parent_code": "MISSING" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics() {
    let app = test_app().await;

    let (_, empty) = call(&app, Method::GET, "/analytics", None).await;
    assert_eq!(empty["total"], 0);

    for department in ["ED", "ED", "BBMP"] {
        call(&app, Method::POST, "/complaints", Some(complaint_body(department))).await;
    }

    let (status, body) = call(&app, Method::GET, "/analytics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["by_status"]["new"], 3);
    assert_eq!(body["by_department"]["ED"], 2);
    assert_eq!(body["by_department"]["BBMP"], 1);
}
