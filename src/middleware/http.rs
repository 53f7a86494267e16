//! Transport-level layers applied to every route.
//!
//! - Request-Id generation + propagation (`x-request-id`)
//! - Access log (TraceLayer), with the request id on the span
//!
//! Body size is bounded per pipeline (`Pipeline::body_limit`) so an oversized
//! body is still answered with the uniform `{ "error": ... }` shape.

use axum::Router;
use axum::http::{Request, header::HeaderName};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %req.method(),
            path = %req.uri().path(),
            request_id,
        )
    });

    let layers = ServiceBuilder::new()
        // outermost: the id must exist before the trace span is created
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(trace);

    router.layer(layers)
}
