//! Ordered interceptor chain.
//!
//! A `Pipeline` is a flat list of interceptors plus one terminal handler.
//! `run` drives the list in declaration order and returns at the first
//! stage that fails; the handler only runs when every stage passed.

use std::{future::Future, pin::Pin, sync::Arc};

use crate::error::AppError;
use crate::pipeline::context::{Reply, RequestCtx};

/// One stage of a pipeline.
///
/// A stage either augments the context and returns `Ok(())` (the chain
/// continues) or returns the error that ends the request.
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &'static str;

    fn intercept(&self, ctx: &mut RequestCtx) -> Result<(), AppError>;
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply, AppError>> + Send>>;

type BoxedHandler<S> = Arc<dyn Fn(S, RequestCtx) -> HandlerFuture + Send + Sync>;

pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

pub struct Pipeline<S> {
    pub(super) stages: Vec<Arc<dyn Interceptor>>,
    pub(super) handler: BoxedHandler<S>,
    pub(super) body_limit: usize,
}

impl<S> Clone for Pipeline<S> {
    fn clone(&self) -> Self {
        Self {
            stages: self.stages.clone(),
            handler: Arc::clone(&self.handler),
            body_limit: self.body_limit,
        }
    }
}

impl<S> std::fmt::Debug for Pipeline<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

impl<S> Pipeline<S>
where
    S: Send + 'static,
{
    /// A pipeline with no stages around `handler`.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(S, RequestCtx) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, AppError>> + Send + 'static,
    {
        let boxed: BoxedHandler<S> =
            Arc::new(move |state: S, ctx: RequestCtx| -> HandlerFuture {
                Box::pin(handler(state, ctx))
            });

        Self {
            stages: Vec::new(),
            handler: boxed,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Append a stage. Stages run in the order they are added.
    pub fn stage(self, stage: impl Interceptor + 'static) -> Self {
        self.shared_stage(Arc::new(stage))
    }

    pub fn shared_stage(mut self, stage: Arc<dyn Interceptor>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<S> Pipeline<S> {
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Drive the stages, then the handler.
    pub async fn run(&self, state: S, mut ctx: RequestCtx) -> Result<Reply, AppError> {
        for stage in &self.stages {
            if let Err(err) = stage.intercept(&mut ctx) {
                tracing::debug!(stage = stage.name(), kind = err.kind().as_str(), "short-circuit");
                return Err(err);
            }
        }

        (self.handler)(state, ctx).await
    }
}
