//! HTTP server implementation for the chatbot backend

use std::future::Future;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use ai_chatbot_core::log_info;

use super::handlers;
use crate::error::ServerError;
use crate::state::AppState;

/// Header the frontend uses to forward the identity token
pub const CLERK_AUTH_HEADER: HeaderName = HeaderName::from_static("x-clerk-auth-token");

fn cors_layer(frontend_url: &str) -> Result<CorsLayer, ServerError> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
        .map_err(|_| ServerError::InvalidOrigin(frontend_url.to_string()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, CLERK_AUTH_HEADER]))
}

/// Creates the application router with all routes and middleware
pub fn create_router(state: AppState) -> Result<Router, ServerError> {
    let cors = cors_layer(&state.config.server.frontend_url)?;
    let environment = state.config.server.environment;
    let body_limit = state.config.server.body_limit_bytes;

    Ok(Router::new()
        // System routes
        .route("/health", get(handlers::health_check))
        .route("/api/test", get(handlers::diagnostics))

        // Everything else
        .fallback(handlers::not_found)

        // Apply middleware to ALL routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::custom(move |err| handlers::panic_response(environment, err)))
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state))
}

/// Serve until `shutdown` resolves, then drain in-flight requests
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.server.http_addr;
    let environment = state.config.server.environment;
    let app = create_router(state)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;

    log_info!("Server listening on http://{}", addr);
    log_info!("Environment: {}", environment.as_str());
    log_info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
