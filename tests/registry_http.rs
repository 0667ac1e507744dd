//! End-to-end tests against a running registry server.

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_create_update_and_serve() {
    let server = common::start_server(None).await;
    let client = common::client();

    let res = client
        .post(server.url("/api/create"))
        .json(&json!({"path": "/test", "method": "GET", "response": {"message": "ok"}}))
        .send()
        .await
        .expect("registry unreachable");
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(server.routes.path().join("test.json").exists());

    let res = client.get(server.url("/test")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"message": "ok"}));

    let res = client
        .put(server.url("/api/update"))
        .json(&json!({"path": "/test", "newResponse": {"status": "updated"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/test")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"status": "updated"}));

    server.stop().await;
}

#[tokio::test]
async fn test_rejections() {
    let server = common::start_server(None).await;
    let client = common::client();

    let res = client
        .post(server.url("/api/create"))
        .json(&json!({"path": "/t", "method": "TRACE", "response": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(std::fs::read_dir(server.routes.path()).unwrap().count(), 0);

    let res = client.get(server.url("/t")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(server.url("/api/update"))
        .json(&json!({"path": "/never-created", "newResponse": {}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.stop().await;
}

#[tokio::test]
async fn test_multipart_upload_creates_route() {
    let server = common::start_server(None).await;
    let client = common::client();

    let file = reqwest::multipart::Part::text(r#"{"items": [1, 2]}"#)
        .file_name("payload.json")
        .mime_str("application/json")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("path", "/from-file")
        .text("method", "PATCH")
        .part("file", file);

    let res = client
        .post(server.url("/api/create"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.patch(server.url("/from-file")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"items": [1, 2]}));

    let text = reqwest::multipart::Part::text("plain text")
        .file_name("notes.txt")
        .mime_str("text/plain")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("path", "/notes")
        .part("file", text);
    let res = client
        .post(server.url("/api/create"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.stop().await;
}

#[tokio::test]
async fn test_restart_rebinds_valid_records_only() {
    let server = common::start_server(None).await;
    let client = common::client();

    client
        .post(server.url("/api/create"))
        .json(&json!({"path": "/persisted", "method": "POST", "response": false}))
        .send()
        .await
        .unwrap();
    let routes = server.stop().await;

    common::write_record(routes.path(), "incomplete.json", r#"{"path": "/incomplete", "method": "GET"}"#);
    common::write_record(routes.path(), "garbage.json", "not json at all");

    let server = common::start_server(Some(routes)).await;
    let client = common::client();

    let res = client.post(server.url("/persisted")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!(false));

    let res = client.get(server.url("/incomplete")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let spec: Value = client
        .get(server.url("/openapi.json"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(spec["paths"]["/persisted"]["post"].is_object());
    assert!(spec["paths"].get("/incomplete").is_none());

    server.stop().await;
}
