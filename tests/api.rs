//! REST API tests: a real router over the in-memory store, driven through
//! `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use notepad_server::handlers::router;
use notepad_server::repository::MemoryNoteStore;
use notepad_server::seed::seed_sample_notes;
use notepad_server::service::NoteService;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn setup() -> axum::Router {
    let store = Arc::new(MemoryNoteStore::new());
    router(Arc::new(NoteService::new(store)))
}

async fn setup_seeded() -> axum::Router {
    let store = Arc::new(MemoryNoteStore::new());
    seed_sample_notes(store.as_ref()).await.expect("seed");
    router(Arc::new(NoteService::new(store)))
}

fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    match body {
        Some(val) => builder.body(Body::from(val.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(router, request).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn create(router: &axum::Router, title: &str, content: &str) -> Value {
    let (status, body) = send_json(
        router,
        json_request(
            Method::POST,
            "/notepads",
            Some(json!({ "title": title, "content": content })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .expect("array body")
        .iter()
        .map(|n| n["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_full_record() {
    let router = setup();

    let (status, body) = send_json(
        &router,
        json_request(
            Method::POST,
            "/notepads",
            Some(json!({ "id": null, "title": "T", "content": "C", "archived": true })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_i64());
    assert_eq!(body["title"], "T");
    assert_eq!(body["content"], "C");
    assert_eq!(body["archived"], false);
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn get_one_matches_created() {
    let router = setup();
    let created = create(&router, "Title", "line one\nline two").await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &router,
        json_request(Method::GET, &format!("/notepads/{id}"), None),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);
}

#[tokio::test]
async fn get_missing_note_is_404_with_empty_body() {
    let router = setup();

    let (status, body) = send(&router, json_request(Method::GET, "/notepads/424242", None)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_empty());
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_archived() {
    let router = setup();
    let created = create(&router, "Old", "old body").await;
    let id = created["id"].as_i64().unwrap();

    let (_, archived) = send_json(
        &router,
        json_request(
            Method::PUT,
            &format!("/notepads/{id}"),
            Some(json!({ "title": "New", "content": "new body", "archived": true })),
        ),
    )
    .await;
    assert_eq!(archived["archived"], true);

    let (status, body) = send_json(
        &router,
        json_request(
            Method::PUT,
            &format!("/notepads/{id}"),
            Some(json!({ "title": "", "content": "" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "");
    assert_eq!(body["content"], "");
    assert_eq!(body["archived"], true);
    assert_eq!(body["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_missing_note_is_404() {
    let router = setup();

    let (status, _) = send(
        &router,
        json_request(
            Method::PUT,
            "/notepads/99",
            Some(json!({ "title": "a", "content": "b" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let router = setup();
    let id = create(&router, "a", "b").await["id"].as_i64().unwrap();
    let uri = format!("/notepads/{id}");

    let (status, _) = send(&router, json_request(Method::DELETE, &uri, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, json_request(Method::GET, &uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, json_request(Method::DELETE, &uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shopping_list_scenario() {
    let router = setup();
    let note = create(&router, "Shopping List", "Milk\nBread\nEggs").await;
    create(&router, "Meeting Notes", "Agenda").await;
    let id = note["id"].as_i64().unwrap();

    let (status, found) = send_json(
        &router,
        json_request(Method::GET, "/notepads/search/content?content=bread", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&found), vec![id]);

    let (status, toggled) = send_json(
        &router,
        json_request(
            Method::PATCH,
            &format!("/notepads/{id}/toggle-archive"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["archived"], true);

    let (_, archived) = send_json(
        &router,
        json_request(Method::GET, "/notepads/archived", None),
    )
    .await;
    let (_, active) = send_json(&router, json_request(Method::GET, "/notepads/active", None)).await;
    assert!(ids(&archived).contains(&id));
    assert!(!ids(&active).contains(&id));
}

#[tokio::test]
async fn toggle_missing_note_is_404() {
    let router = setup();

    let (status, _) = send(
        &router,
        json_request(Method::PATCH, "/notepads/5/toggle-archive", None),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Search and filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_is_case_insensitive_across_title_and_content() {
    let router = setup_seeded().await;

    let (_, milk) = send_json(&router, json_request(Method::GET, "/notepads/search?q=MILK", None)).await;
    assert_eq!(milk.as_array().unwrap().len(), 1);
    assert_eq!(milk[0]["title"], "Shopping List");

    let (_, notes) = send_json(
        &router,
        json_request(Method::GET, "/notepads/search?q=notes", None),
    )
    .await;
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["title"], "Meeting Notes");

    let (_, title) = send_json(
        &router,
        json_request(Method::GET, "/notepads/search/title?title=IDEAS", None),
    )
    .await;
    assert_eq!(title.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn empty_search_matches_everything() {
    let router = setup_seeded().await;

    for uri in [
        "/notepads/search?q=",
        "/notepads/search/title?title=",
        "/notepads/search/content?content=",
    ] {
        let (status, body) = send_json(&router, json_request(Method::GET, uri, None)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body.as_array().unwrap().len(), 5, "{uri}");
    }
}

#[tokio::test]
async fn created_after_rejects_malformed_date() {
    let router = setup();

    for uri in [
        "/notepads/created-after?date=not-a-date",
        "/notepads/updated-after?date=2024-99-99",
    ] {
        let (status, _) = send(&router, json_request(Method::GET, uri, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn date_without_seconds_is_accepted() {
    let router = setup();
    create(&router, "a", "b").await;

    let (status, body) = send_json(
        &router,
        json_request(
            Method::GET,
            "/notepads/created-after?date=2000-01-01T00:00",
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn date_filters_return_newer_notes() {
    let router = setup();
    create(&router, "a", "b").await;

    let (status, past) = send_json(
        &router,
        json_request(
            Method::GET,
            "/notepads/created-after?date=2000-01-01T00:00:00",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(past.as_array().unwrap().len(), 1);

    let (status, future) = send_json(
        &router,
        json_request(
            Method::GET,
            "/notepads/updated-after?date=2999-01-01T00:00:00Z",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(future.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Rejected requests
// ---------------------------------------------------------------------------

fn assert_structured_500(status: StatusCode, body: &Value) {
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An unexpected error occurred");
    assert!(body["timestamp"].is_string());
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn non_numeric_id_is_structured_500() {
    let router = setup();

    let (status, body) = send_json(&router, json_request(Method::GET, "/notepads/abc", None)).await;

    assert_structured_500(status, &body);
    assert!(body["details"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn missing_search_parameter_is_structured_500() {
    let router = setup();

    for uri in [
        "/notepads/search",
        "/notepads/search/title",
        "/notepads/search/content",
        "/notepads/created-after",
    ] {
        let (status, body) = send_json(&router, json_request(Method::GET, uri, None)).await;
        assert_structured_500(status, &body);
    }
}

#[tokio::test]
async fn incomplete_body_is_structured_500() {
    let router = setup();

    let (status, body) = send_json(
        &router,
        json_request(Method::POST, "/notepads", Some(json!({ "title": "t" }))),
    )
    .await;
    assert_structured_500(status, &body);
    assert!(body["details"].as_str().unwrap().contains("content"));

    let (status, body) = send_json(
        &router,
        json_request(Method::PUT, "/notepads/1", Some(json!({ "content": "c" }))),
    )
    .await;
    assert_structured_500(status, &body);

    let (_, all) = send_json(&router, json_request(Method::GET, "/notepads", None)).await;
    assert!(all.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Stats and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stats_reflect_seeded_data() {
    let router = setup_seeded().await;

    let (status, body) = send_json(&router, json_request(Method::GET, "/notepads/stats", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 5, "active": 4, "archived": 1 }));
}

#[tokio::test]
async fn list_all_returns_every_note() {
    let router = setup_seeded().await;

    let (status, body) = send_json(&router, json_request(Method::GET, "/notepads", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn health_reports_up() {
    let router = setup();

    let (status, body) = send_json(&router, json_request(Method::GET, "/notepads/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert!(body["message"].is_string());
}
