//! API integration tests.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::{
    completion_body, spawn_upstream, test_app, test_app_with_reply, test_app_without_credential,
};

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method(Method::POST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Test that health endpoint works and reports liveness.
#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app_with_reply("unused").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .method(Method::GET)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert!(json["timestamp"].is_string());
}

/// Test a text turn end to end against a mock upstream.
#[tokio::test]
async fn test_chat_turn_returns_assistant_reply() {
    let app = test_app_with_reply("hello from the model").await;

    let response = app
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "s1", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["message"], "hello from the model");
    assert_eq!(json["data"]["role"], "assistant");
    assert_eq!(json["data"]["sessionId"], "s1");
}

/// Test that an empty message is rejected with the literal validation message.
#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = test_app_with_reply("unused").await;

    let response = app
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "s1", "message": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], "message is empty");
    assert_eq!(json["error"]["code"], 400);
}

/// Test that an empty session identifier is rejected.
#[tokio::test]
async fn test_chat_rejects_empty_session_id() {
    let app = test_app_with_reply("unused").await;

    let response = app
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "sessionId must be a non-empty string");
}

/// Test that an upstream-reported error message passes through with 502.
#[tokio::test]
async fn test_chat_passes_upstream_error_message_through() {
    let base_url = spawn_upstream(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"error":{"message":"rate limited"}}),
    )
    .await;
    let app = test_app(base_url);

    let response = app
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "s1", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["message"], "rate limited");
    assert_eq!(json["error"]["code"], 502);
}

/// Test that a missing credential surfaces as a generic 500, with the cause
/// kept out of the response.
#[tokio::test]
async fn test_missing_credential_returns_generic_error() {
    let app = test_app_without_credential();

    let response = app
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "s1", "message": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    let message = json["error"]["message"].as_str().unwrap();
    assert_eq!(message, "Something went wrong. Please try again.");
    assert!(!message.contains("credential"));
}

/// Test clearing a session's history.
#[tokio::test]
async fn test_clear_history() {
    let app = test_app_with_reply("reply").await;

    // Populate the session, then reset it.
    app.clone()
        .oneshot(json_request(
            "/chat",
            json!({"sessionId": "s1", "message": "hi"}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request("/clear-history", json!({"sessionId": "s1"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["message"].as_str().unwrap().contains("cleared"));
}

fn multipart_request(
    session_id: &str,
    message: Option<&str>,
    file_name: &str,
    content_type: &str,
    file_body: &[u8],
) -> Request<Body> {
    let boundary = "prattle-test-boundary";
    let mut body: Vec<u8> = Vec::new();

    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"sessionId\"\r\n\r\n{session_id}\r\n"
        )
        .as_bytes(),
    );
    if let Some(message) = message {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"message\"\r\n\r\n{message}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_body);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .uri("/chat-file")
        .method(Method::POST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Test a file turn with a plain-text attachment.
#[tokio::test]
async fn test_chat_file_with_text_attachment() {
    let app = test_app_with_reply("a summary of your notes").await;

    let response = app
        .oneshot(multipart_request(
            "s1",
            Some("summarize this"),
            "notes.txt",
            "text/plain",
            b"meeting notes",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["message"], "a summary of your notes");
    assert_eq!(json["data"]["role"], "assistant");
    assert_eq!(json["data"]["fileName"], "notes.txt");
}

/// Test that a disallowed attachment type is rejected with 400.
#[tokio::test]
async fn test_chat_file_rejects_disallowed_type() {
    let app = test_app_with_reply("unused").await;

    let response = app
        .oneshot(multipart_request(
            "s1",
            None,
            "archive.zip",
            "application/zip",
            b"PK\x03\x04",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(
        json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("application/zip")
    );
}

/// Test that a multipart body without a file part is rejected.
#[tokio::test]
async fn test_chat_file_requires_file_part() {
    let app = test_app_with_reply("unused").await;

    let boundary = "prattle-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"sessionId\"\r\n\r\ns1\r\n--{boundary}--\r\n"
    );
    let response = app
        .oneshot(
            Request::builder()
                .uri("/chat-file")
                .method(Method::POST)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"]["message"], "no file attachment found");
}

/// Test consecutive turns share one session history: the second request's
/// reply still succeeds after the first populated the session.
#[tokio::test]
async fn test_consecutive_turns_share_session() {
    let base_url = spawn_upstream(StatusCode::OK, completion_body("ok")).await;
    let app = test_app(base_url);

    for message in ["first", "second"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "/chat",
                json!({"sessionId": "shared", "message": message}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
