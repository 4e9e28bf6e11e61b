// tests/common/request.rs
use axum::{
    body::Body,
    http::{header, Method, Request},
};
use serde_json::{json, Value};

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_PASSWORD: &str = "Password123";

/// API キー付きのリクエストを作成
pub fn api_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .header("x-api-key", TEST_API_KEY);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// ヘッダーを個別に指定したリクエストを作成
pub fn raw_request(method: &str, uri: &str, headers: &[(&str, &str)], body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn register_body(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": TEST_PASSWORD,
        "password_confirmation": TEST_PASSWORD,
    })
}
