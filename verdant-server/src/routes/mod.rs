//! HTTP routes
//!
//! Handlers stay thin: parse, call a service, shape the response. Status
//! mapping lives in [`crate::error`].

mod auth;
mod notifications;
mod plants;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// 10 MB, enough headroom for base64 photo payloads.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let origin = state
        .config
        .client_url
        .parse::<HeaderValue>()
        .expect("CLIENT_URL must be a valid origin");
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/plants", plants::router())
        .nest("/api/notifications", notifications::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
