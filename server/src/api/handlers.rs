//! HTTP request handlers for the chatbot backend

use std::any::Any;

use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use ai_chatbot_core::core::Environment;
use ai_chatbot_core::log_error;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `OK` while the process serves requests
    pub status: String,
    /// Human-readable service line
    pub message: String,
    /// Current time, RFC 3339
    pub timestamp: String,
    /// Deployment environment
    pub environment: String,
}

/// Configuration diagnostics
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResponse {
    /// Human-readable service line
    pub message: String,
    /// `configured` or `missing`
    pub gemini_key: &'static str,
    /// `configured` or `missing`
    pub clerk_key: &'static str,
    /// `connected` or `disconnected`
    pub database: &'static str,
}

/// Error body for unknown routes
#[derive(Debug, Serialize)]
pub struct NotFoundResponse {
    /// Always `Route not found`
    pub error: String,
    /// Requested path including the query string
    pub path: String,
    /// Request method
    pub method: String,
}

/// Error body for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,
    /// Details in development, a generic line otherwise
    pub message: String,
}

fn presence(value: &Option<String>) -> &'static str {
    if value.as_deref().is_some_and(|v| !v.is_empty()) {
        "configured"
    } else {
        "missing"
    }
}

/// Health check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "AI Chatbot Backend is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        environment: state.config.server.environment.as_str().to_string(),
    })
}

/// Which secrets are configured and whether the database is up
pub async fn diagnostics(State(state): State<AppState>) -> Json<DiagnosticsResponse> {
    Json(DiagnosticsResponse {
        message: "Backend API is working".to_string(),
        gemini_key: presence(&state.config.llm.api_key),
        clerk_key: presence(&state.config.identity.secret_key),
        database: if state.database.is_connected() {
            "connected"
        } else {
            "disconnected"
        },
    })
}

/// Fallback for unknown routes
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    (
        StatusCode::NOT_FOUND,
        Json(NotFoundResponse {
            error: "Route not found".to_string(),
            path,
            method: method.to_string(),
        }),
    )
}

/// Turn a handler panic into a JSON 500; the panic text is only exposed in
/// development
pub fn panic_response(environment: Environment, err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };
    log_error!("Server error: {}", details);

    let body = ErrorResponse {
        error: "Internal server error".to_string(),
        message: match environment {
            Environment::Development => details,
            _ => "Something went wrong".to_string(),
        },
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn message_of(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        body["message"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn panic_details_only_in_development() {
        let dev = panic_response(Environment::Development, Box::new("boom"));
        assert_eq!(dev.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_of(dev).await, "boom");

        let prod = panic_response(Environment::Production, Box::new(String::from("boom")));
        assert_eq!(prod.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message_of(prod).await, "Something went wrong");
    }

    #[test]
    fn key_presence() {
        assert_eq!(presence(&Some("k".into())), "configured");
        assert_eq!(presence(&Some(String::new())), "missing");
        assert_eq!(presence(&None), "missing");
    }
}
