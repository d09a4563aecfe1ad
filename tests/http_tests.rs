//! Router-level tests for the echo API.
//!
//! Requests are sent straight into the router with `tower::ServiceExt::oneshot`,
//! so no socket is involved and headers are exactly what each test sets.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use boilerai_server::credentials::ApiKey;
use boilerai_server::{create_router, AppState, Session};

fn app(initialized: bool) -> Router {
    let session = if initialized {
        Session::with_key("gemini", ApiKey::new("AIzaSyTESTKEY").unwrap())
    } else {
        Session::new("gemini")
    };
    create_router(AppState::new(session))
}

fn query_request(body: impl Into<String>) -> Request<Body> {
    let body = body.into();
    Request::builder()
        .method(Method::POST)
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_health_reports_initialized() {
    let response = app(true)
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({"status": "ok", "initialized": true, "provider": "gemini", "mode": "echo"})
    );
}

#[tokio::test]
async fn test_health_reports_uninitialized() {
    let response = app(false)
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["initialized"], json!(false));
}

#[tokio::test]
async fn test_query_echoes_input() {
    let queries = [
        "hello",
        "What prerequisites does CS 251 have?",
        "  leading and trailing  ",
        "line one\nline two\ttabbed",
        "unicode: café 日本語 🚀",
        "\"quotes\" and \\backslashes\\",
        "{\"looks\": \"like json\"}",
    ];

    for q in queries {
        let body = json!({ "query": q }).to_string();
        let response = app(true).oneshot(query_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "query {:?}", q);
        assert_eq!(
            body_json(response).await,
            json!({"success": true, "response": q, "provider": "gemini", "api_key_set": true})
        );
    }
}

#[tokio::test]
async fn test_query_long_input_unchanged() {
    let q = "x".repeat(10_000);
    let body = json!({ "query": q }).to_string();
    let response = app(true).oneshot(query_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["response"], json!(q));
}

#[tokio::test]
async fn test_query_over_default_body_limit_is_echoed() {
    // Larger than axum's 2 MiB default extractor limit
    let q = "x".repeat(3 * 1024 * 1024);
    let body = json!({ "query": q }).to_string();
    let response = app(true).oneshot(query_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["response"].as_str().unwrap().len(), q.len());
    assert_eq!(body["response"], json!(q));
}

#[tokio::test]
async fn test_query_non_object_body_is_500() {
    for body in ["[]", r#"["hi"]"#, r#""hi""#, "42", "null"] {
        let response = app(true).oneshot(query_request(body)).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "body {}",
            body
        );
        let json = body_json(response).await;
        assert_eq!(json["success"], json!(false), "body {}", body);
        assert!(!json["error"].as_str().unwrap().is_empty(), "body {}", body);
    }
}

#[tokio::test]
async fn test_query_missing_field_echoes_empty() {
    let response = app(true).oneshot(query_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["response"], json!(""));
}

#[tokio::test]
async fn test_query_before_setup_fails() {
    let body = json!({ "query": "hello" }).to_string();
    let response = app(false).oneshot(query_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": false, "error": "CLI not initialized"})
    );
}

#[tokio::test]
async fn test_query_malformed_json_is_500() {
    let response = app(true).oneshot(query_request("{not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_wrong_field_type_is_500() {
    let response = app(true)
        .oneshot(query_request(r#"{"query": 42}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["success"], json!(false));
}

#[tokio::test]
async fn test_query_missing_content_length_is_500() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/query")
        .body(Body::from(r#"{"query":"hi"}"#))
        .unwrap();
    let response = app(true).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Missing Content-Length header"));
}

#[tokio::test]
async fn test_options_preflight_any_path() {
    for uri in ["/query", "/health", "/does/not/exist"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app(true).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK, "OPTIONS {}", uri);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(methods.contains("GET") && methods.contains("POST"));
        assert!(body_bytes(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_options_without_origin_still_200() {
    let response = app(true)
        .oneshot(empty_request(Method::OPTIONS, "/query"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_cors_header_on_regular_responses() {
    let response = app(true)
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let response = app(true).oneshot(query_request("{oops")).await.unwrap();
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_unknown_paths_are_404() {
    let mut unknown_post = query_request(r#"{"query":"hi"}"#);
    *unknown_post.uri_mut() = "/ask".parse().unwrap();

    let cases = [
        empty_request(Method::GET, "/"),
        empty_request(Method::GET, "/status"),
        empty_request(Method::POST, "/health"),
        empty_request(Method::HEAD, "/health"),
        empty_request(Method::HEAD, "/query"),
        empty_request(Method::GET, "/query"),
        empty_request(Method::DELETE, "/query"),
        unknown_post,
    ];

    for request in cases {
        let label = format!("{} {}", request.method(), request.uri());
        let response = app(true).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", label);
        assert!(body_bytes(response).await.is_empty(), "{}", label);
    }
}

#[tokio::test]
async fn test_responses_carry_request_id_and_no_store() {
    let response = app(true)
        .oneshot(empty_request(Method::GET, "/health"))
        .await
        .unwrap();

    let request_id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(request_id.len(), 36);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
}
