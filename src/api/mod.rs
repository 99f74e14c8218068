//! HTTP surface of the server.
//!
//! Two POST operations, a health check, and JSON 404/405/500 fallbacks, all
//! wrapped in the fixed CORS header set.

pub mod cors;
pub mod error;
pub mod handlers;

pub use cors::RouterCorsExt;
pub use error::ApiError;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::gate::RequestGate;

pub const ANALYZE_PATH: &str = "/api/analyze-personality";
pub const PORTRAIT_PATH: &str = "/api/generate-portrait";
pub const HEALTH_PATH: &str = "/api/health";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<RequestGate>,
}

/// Build the full router around `gate`.
pub fn router(gate: Arc<RequestGate>) -> Router {
    let routes = Router::new()
        .route(
            ANALYZE_PATH,
            post(handlers::analyze_personality)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            PORTRAIT_PATH,
            post(handlers::generate_portrait)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            HEALTH_PATH,
            get(handlers::health)
                .options(handlers::preflight)
                .fallback(handlers::method_not_allowed),
        );

    with_middleware(routes).with_state(AppState { gate })
}

/// Add the 404 fallback, panic catching, CORS headers and request tracing.
///
/// Panics are caught inside the CORS layer so 500 responses still carry the
/// header set.
pub fn with_middleware(routes: Router<AppState>) -> Router<AppState> {
    routes
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(error::catch_panic))
        .with_cors_headers()
        .layer(TraceLayer::new_for_http())
}
