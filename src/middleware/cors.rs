//! CORS policy for browser clients.
//!
//! - Development / test: any origin, without credentials.
//! - Production: exact-match allowlist from `CORS_ALLOWED_ORIGINS`. An empty
//!   list allows no origin at all.

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;
use crate::middleware::http::REQUEST_ID_HEADER;

pub fn apply(router: Router, config: &Config) -> Router {
    router.layer(layer(config))
}

fn layer(config: &Config) -> CorsLayer {
    let base = if config.app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    };

    base.allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ])
    .allow_headers([
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        HeaderName::from_static(REQUEST_ID_HEADER),
    ])
    .max_age(Duration::from_secs(60 * 10))
}
