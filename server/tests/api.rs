use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use ai_chatbot_core::core::{Config, Environment};
use ai_chatbot_server::api::create_router;
use ai_chatbot_server::db::DatabaseHandle;
use ai_chatbot_server::AppState;

fn app(config: Config) -> Router {
    create_router(AppState::new(config, DatabaseHandle::disconnected())).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let mut config = Config::default();
    config.server.environment = Environment::Test;

    let response = app(config)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "OK");
    assert_eq!(body["environment"], "test");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn diagnostics_report_configuration() {
    let mut config = Config::default();
    config.llm.api_key = Some("secret".into());

    let response = app(config)
        .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["geminiKey"], "configured");
    assert_eq!(body["clerkKey"], "missing");
    assert_eq!(body["database"], "disconnected");
    assert!(body.get("secret").is_none());
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let response = app(Config::default())
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/chats/42?force=1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Route not found");
    assert_eq!(body["path"], "/api/chats/42?force=1");
    assert_eq!(body["method"], "DELETE");
}

#[tokio::test]
async fn preflight_from_frontend_is_allowed() {
    let mut config = Config::default();
    config.server.frontend_url = "http://localhost:5173".into();

    let response = app(config)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/test")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-clerk-auth-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap()
        .contains("x-clerk-auth-token"));
}

#[tokio::test]
async fn other_origins_get_no_cors_headers() {
    let response = app(Config::default())
        .oneshot(
            Request::get("/health")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[test]
fn invalid_frontend_origin_is_rejected() {
    let mut config = Config::default();
    config.server.frontend_url = "http://bad\norigin".into();
    assert!(create_router(AppState::new(config, DatabaseHandle::disconnected())).is_err());
}
