//! The terminal error boundary.
//!
//! `Pipeline::serve` wraps context construction, every stage and the handler.
//! Whatever comes out (a reply, a classified error, or a panic coerced into
//! `Internal`) is rendered here exactly once. This is also the only place
//! that logs error detail.

use std::{any::Any, future::Future, panic::AssertUnwindSafe, pin::Pin, sync::Arc};

use axum::{
    Json,
    extract::{FromRef, Request, State},
    http::Method,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;

use crate::error::{AppError, ErrorKind, ExposurePolicy};
use crate::pipeline::chain::Pipeline;
use crate::pipeline::context::{Reply, RequestCtx};

pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

impl<S> Pipeline<S>
where
    S: Clone + Send + Sync + 'static,
    ExposurePolicy: FromRef<S>,
{
    /// Serve one request end to end. Always yields exactly one response.
    pub async fn serve(&self, state: S, req: Request) -> Response {
        let policy = ExposurePolicy::from_ref(&state);
        let method = req.method().clone();
        let path = req.uri().path().to_owned();

        let outcome = AssertUnwindSafe(self.dispatch(state, req))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(AppError::internal(panic_message(payload.as_ref()))));

        render(outcome, policy, &method, &path)
    }

    async fn dispatch(&self, state: S, req: Request) -> Result<Reply, AppError> {
        let ctx = RequestCtx::from_request(req, self.body_limit).await?;
        self.run(state, ctx).await
    }

    /// Turn the pipeline into an axum handler.
    ///
    /// ```ignore
    /// Router::new().route("/service", post(pipeline.into_endpoint()))
    /// ```
    pub fn into_endpoint(
        self,
    ) -> impl Fn(State<S>, Request) -> ResponseFuture + Clone + Send + Sync + 'static {
        let pipeline = Arc::new(self);
        move |State(state): State<S>, req: Request| -> ResponseFuture {
            let pipeline = Arc::clone(&pipeline);
            Box::pin(async move { pipeline.serve(state, req).await })
        }
    }
}

/// Render a pipeline outcome. Errors are logged here and nowhere else.
pub fn render(
    outcome: Result<Reply, AppError>,
    policy: ExposurePolicy,
    method: &Method,
    path: &str,
) -> Response {
    match outcome {
        Ok(reply) => reply.into_response(),
        Err(err) => {
            log_failure(&err, method, path);
            (err.status(), Json(err.to_body(policy))).into_response()
        }
    }
}

fn log_failure(err: &AppError, method: &Method, path: &str) {
    let kind = err.kind().as_str();
    let detail = err.internal_detail().unwrap_or_default();

    match err.kind() {
        ErrorKind::Internal => tracing::error!(
            %method, path, kind, detail, "request failed"
        ),
        ErrorKind::Unauthorized | ErrorKind::Forbidden => tracing::warn!(
            %method, path, kind, message = err.public_message(), detail, "request rejected"
        ),
        ErrorKind::BadRequest | ErrorKind::NotFound => tracing::debug!(
            %method, path, kind, message = err.public_message(), detail, "request rejected"
        ),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}
