use account_backend::log_with_context;
use account_backend::logging::{inject_request_context, logging_middleware, RequestContext};
use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;

fn logged_router() -> Router {
    Router::new()
        .route("/ok", get(|| async { "ok" }))
        .route(
            "/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        )
        .route(
            "/context",
            get(|Extension(context): Extension<RequestContext>| async move {
                assert!(!context.request_id.is_empty());
                assert_eq!(context.path, "/context");
                assert_eq!(context.method, "GET");
                "context"
            }),
        )
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(inject_request_context))
}

#[tokio::test]
async fn test_structured_logging_macro() {
    log_with_context!(tracing::Level::INFO, "Test message without context");

    let user_id = uuid::Uuid::new_v4();
    log_with_context!(
        tracing::Level::INFO,
        "Test message with context",
        "user_id" => user_id,
        "operation" => "test"
    );

    log_with_context!(
        tracing::Level::ERROR,
        "Error occurred during test",
        "error" => "Test error",
        "user_id" => user_id
    );

    log_with_context!(
        tracing::Level::WARN,
        "Warning during test",
        "warning_type" => "test_warning"
    );

    log_with_context!(
        tracing::Level::DEBUG,
        "Debug information",
        "debug_data" => "test_data"
    );
}

#[tokio::test]
async fn test_request_id_header_is_attached() {
    let app = logged_router();

    for (path, expected) in [
        ("/ok", StatusCode::OK),
        ("/error", StatusCode::INTERNAL_SERVER_ERROR),
        ("/not-found", StatusCode::NOT_FOUND),
    ] {
        let response = app
            .clone()
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), expected);
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());
    }
}

#[tokio::test]
async fn test_client_request_id_is_propagated() {
    let response = logged_router()
        .oneshot(
            Request::get("/context")
                .header("x-request-id", "client-supplied-id")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-supplied-id"
    );
}
