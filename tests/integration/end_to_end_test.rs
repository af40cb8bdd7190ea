//! End-to-end integration tests for the request inspector
//!
//! These tests drive a real axum router through the inspector middleware and
//! read the results back from the inspection endpoint.

use super::{body_bytes, default_inspector, fetch_page, get_path, post_json, send, test_app};
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode};
use request_inspector::{Inspector, InspectorConfig};
use serde_json::{json, Value};
use std::net::SocketAddr;

#[tokio::test]
async fn test_json_post_is_flattened_and_body_still_readable() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    let response = post_json(
        &app,
        "/users?source=signup",
        r#"{"user":{"name":"Alice","roles":["admin","editor"]}}"#,
    )
    .await;

    // The handler still received the full body after capture read it.
    assert_eq!(response.status(), StatusCode::CREATED);
    let echoed: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(echoed["user"]["roles"][1], "editor");

    let page = fetch_page(&app, "").await;
    assert_eq!(page.total, 1);

    let snapshot = &page.data[0];
    assert_eq!(snapshot.request_url, "/users");
    assert_eq!(snapshot.http_method, "POST");
    assert_eq!(snapshot.http_status, 201);
    assert_eq!(snapshot.content_type, "application/json");
    assert_eq!(snapshot.get_params.get("source"), Some("signup"));

    let json = snapshot.json.as_ref().expect("JSON group present");
    assert_eq!(json.get("user.name"), Some("Alice"));
    assert_eq!(json.get("user.roles[0]"), Some("admin"));
    assert_eq!(json.get("user.roles[1]"), Some("editor"));
}

#[tokio::test]
async fn test_status_reflects_handler_outcome() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    get_path(&app, "/health").await;
    send(&app, Request::post("/fail").body(Body::empty()).unwrap()).await;
    get_path(&app, "/missing").await;

    let page = fetch_page(&app, "").await;
    let statuses: Vec<u16> = page.data.iter().map(|s| s.http_status).collect();
    assert_eq!(statuses, vec![404, 500, 200]);
}

#[tokio::test]
async fn test_inspection_requests_are_not_captured() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    get_path(&app, "/health").await;
    fetch_page(&app, "").await;
    fetch_page(&app, "page=2").await;

    assert_eq!(inspector.store().len(), 1);
    assert_eq!(fetch_page(&app, "").await.total, 1);
}

#[tokio::test]
async fn test_non_get_on_inspection_path_passes_through() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    let response = send(
        &app,
        Request::post("/_inspector").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(inspector.store().is_empty());
}

#[tokio::test]
async fn test_form_post_headers_and_cookies() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    let response = send(
        &app,
        Request::post("/echo")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Cookie", "session=s3cr3t; theme=dark")
            .header("X-Trace", "trace-1")
            .body(Body::from("name=Bob+Jones&tags=a&tags=b"))
            .unwrap(),
    )
    .await;
    assert_eq!(
        body_bytes(response).await,
        axum::body::Bytes::from_static(b"name=Bob+Jones&tags=a&tags=b")
    );

    let page = fetch_page(&app, "").await;
    let snapshot = &page.data[0];
    assert_eq!(snapshot.post_params.get("name"), Some("Bob Jones"));
    assert_eq!(snapshot.post_params.get_all("tags").len(), 2);
    assert!(snapshot.json.is_none());
    assert_eq!(snapshot.cookies.get("session"), Some("s3cr3t"));
    assert_eq!(snapshot.cookies.get("theme"), Some("dark"));
    assert_eq!(snapshot.headers.get("x-trace"), Some("trace-1"));
}

#[tokio::test]
async fn test_mixed_case_content_type_is_recognised() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    send(
        &app,
        Request::post("/echo")
            .header("Content-Type", "Application/X-WWW-Form-Urlencoded; Charset=UTF-8")
            .body(Body::from("user=bob"))
            .unwrap(),
    )
    .await;

    let page = fetch_page(&app, "").await;
    let snapshot = &page.data[0];
    assert_eq!(snapshot.content_type, "application/x-www-form-urlencoded");
    assert_eq!(snapshot.post_params.get("user"), Some("bob"));
}

#[tokio::test]
async fn test_multipart_metadata_is_recorded() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    let body = "--BOUNDARY\r\n\
                Content-Disposition: form-data; name=\"caption\"\r\n\
                \r\n\
                holiday\r\n\
                --BOUNDARY\r\n\
                Content-Disposition: form-data; name=\"photo\"; filename=\"beach.jpg\"\r\n\
                Content-Type: image/jpeg\r\n\
                \r\n\
                JPEGDATA\r\n\
                --BOUNDARY--\r\n";

    send(
        &app,
        Request::post("/echo")
            .header("Content-Type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap(),
    )
    .await;

    let page = fetch_page(&app, "").await;
    let snapshot = &page.data[0];
    assert_eq!(snapshot.content_type, "multipart/form-data");

    let form = snapshot.post_multipart.as_ref().expect("multipart group present");
    assert_eq!(form.value.get("caption"), Some("holiday"));
    assert_eq!(form.file["photo"][0].filename, "beach.jpg");
    assert_eq!(form.file["photo"][0].content_type, "image/jpeg");
    assert_eq!(form.file["photo"][0].size, 8);
}

#[tokio::test]
async fn test_oversized_body_is_forwarded_but_not_inspected() {
    let inspector = Inspector::new(InspectorConfig {
        max_body_bytes: 8,
        ..Default::default()
    })
    .unwrap();
    let app = test_app(&inspector);

    let payload = r#"{"much":"longer than eight bytes"}"#;
    let response = send(
        &app,
        Request::post("/echo")
            .header("Content-Type", "application/json")
            .body(Body::from(payload))
            .unwrap(),
    )
    .await;
    assert_eq!(body_bytes(response).await, payload.as_bytes());

    let page = fetch_page(&app, "").await;
    assert_eq!(page.total, 1);
    assert!(page.data[0].json.is_none());
}

#[tokio::test]
async fn test_client_ip_resolution() {
    let inspector = default_inspector();
    let app = test_app(&inspector);

    let mut request = Request::get("/health").body(Body::empty()).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo::<SocketAddr>("10.1.2.3:5555".parse().unwrap()));
    send(&app, request).await;

    send(
        &app,
        Request::get("/health")
            .header("X-Forwarded-For", "198.51.100.4, 10.0.0.1")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    let page = fetch_page(&app, "").await;
    assert_eq!(page.data[0].client_ip, "198.51.100.4");
    assert_eq!(page.data[1].client_ip, "10.1.2.3");
}

#[tokio::test]
async fn test_inspection_response_shape() {
    let inspector = default_inspector();
    let app = test_app(&inspector);
    get_path(&app, "/health").await;

    let response = get_path(&app, "/_inspector").await;
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();

    for field in [
        "total",
        "total_page",
        "current_page",
        "per_page",
        "has_next",
        "has_prev",
        "next_page_url",
        "prev_page_url",
        "data",
    ] {
        assert!(body.get(field).is_some(), "missing field {}", field);
    }
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["next_page_url"], json!(""));
    assert_eq!(body["data"][0]["request_url"], json!("/health"));
    assert!(body["data"][0]["json"].is_null());
}

#[tokio::test]
async fn test_custom_inspection_path() {
    let inspector = Inspector::new(InspectorConfig {
        path: "/debug/requests".to_string(),
        ..Default::default()
    })
    .unwrap();
    let app = test_app(&inspector);

    get_path(&app, "/_inspector").await;
    let response = get_path(&app, "/debug/requests").await;
    assert_eq!(response.status(), StatusCode::OK);

    let page: request_inspector::PageView =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].request_url, "/_inspector");
}
