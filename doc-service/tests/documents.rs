mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use support::{login, read_json, register, request, send, test_app};

#[tokio::test]
async fn documents_crud_for_authenticated_users() {
    let app = test_app();
    register(&app, "bob", "pw", "viewer").await;
    let token = login(&app, "bob", "pw").await;

    let response = send(
        &app,
        request(
            Method::POST,
            "/documents",
            Some(&token),
            Some(json!({ "title": "Q3 report", "content": "numbers" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["title"], "Q3 report");

    let response = send(&app, request(Method::GET, "/documents", Some(&token), None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().expect("array").len(), 1);

    let response = send(
        &app,
        request(Method::GET, &format!("/documents/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["content"], "numbers");
}

#[tokio::test]
async fn blank_titles_are_rejected() {
    let app = test_app();
    register(&app, "bob", "pw", "viewer").await;
    let token = login(&app, "bob", "pw").await;

    let response = send(
        &app,
        request(
            Method::POST,
            "/documents",
            Some(&token),
            Some(json!({ "title": "   ", "content": "x" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["code"], "VALIDATION");
}

#[tokio::test]
async fn only_editors_and_admins_delete_documents() {
    let app = test_app();
    register(&app, "editor", "pw", "editor").await;
    register(&app, "viewer", "pw", "viewer").await;
    let editor_token = login(&app, "editor", "pw").await;
    let viewer_token = login(&app, "viewer", "pw").await;

    let response = send(
        &app,
        request(
            Method::POST,
            "/documents",
            Some(&editor_token),
            Some(json!({ "title": "draft", "content": "wip" })),
        ),
    )
    .await;
    let id = read_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = send(
        &app,
        request(
            Method::DELETE,
            &format!("/documents/{id}"),
            Some(&viewer_token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        request(
            Method::DELETE,
            &format!("/documents/{id}"),
            Some(&editor_token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        request(
            Method::GET,
            &format!("/documents/{id}"),
            Some(&editor_token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_document_is_not_found() {
    let app = test_app();
    register(&app, "bob", "pw", "viewer").await;
    let token = login(&app, "bob", "pw").await;

    let id = Uuid::new_v4();
    let response = send(
        &app,
        request(Method::GET, &format!("/documents/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn ingestion_lifecycle_respects_roles() {
    let app = test_app();
    register(&app, "editor", "pw", "editor").await;
    register(&app, "viewer", "pw", "viewer").await;
    let editor_token = login(&app, "editor", "pw").await;
    let viewer_token = login(&app, "viewer", "pw").await;

    // Viewers may look but not trigger.
    let response = send(
        &app,
        request(Method::POST, "/ingestion/trigger", Some(&viewer_token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = send(
        &app,
        request(Method::POST, "/ingestion/trigger", Some(&editor_token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let job = read_json(response).await;
    let id = job["id"].as_str().expect("id").to_string();
    assert_eq!(job["status"], "triggered");

    let response = send(
        &app,
        request(
            Method::PATCH,
            &format!("/ingestion/{id}"),
            Some(&editor_token),
            Some(json!({ "status": "completed" })),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "completed");

    let response = send(
        &app,
        request(
            Method::GET,
            &format!("/ingestion/{id}"),
            Some(&viewer_token),
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        request(Method::GET, "/ingestion", Some(&viewer_token), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().expect("array").len(), 1);
}
