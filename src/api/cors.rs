//! Cross-origin headers attached to every response.
//!
//! `tower_http::cors::CorsLayer` refuses to combine a wildcard origin with
//! `allow-credentials: true`, so the fixed header set is written with
//! `SetResponseHeaderLayer` instead.

use axum::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

pub const ALLOW_CREDENTIALS: &str = "true";
pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
pub const ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// The full CORS header set, in the order it is applied.
pub fn cors_headers() -> [(HeaderName, &'static str); 4] {
    [
        (ACCESS_CONTROL_ALLOW_CREDENTIALS, ALLOW_CREDENTIALS),
        (ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN),
        (ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS),
        (ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS),
    ]
}

/// Extension trait for `axum::`[`Router`] to attach the CORS header set.
pub trait RouterCorsExt<S> {
    fn with_cors_headers(self) -> Self;
}

impl<S> RouterCorsExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_cors_headers(self) -> Self {
        cors_headers()
            .into_iter()
            .fold(self, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::overriding(
                    name,
                    HeaderValue::from_static(value),
                ))
            })
    }
}
