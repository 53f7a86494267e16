/*
 * Responsibility
 * - リクエスト毎の RequestCtx
 * - Interceptor の順序付き chain と handler (Pipeline)
 * - エラーを一度だけ応答に変換する boundary
 */
mod boundary;
mod chain;
mod context;

pub use boundary::{ResponseFuture, render};
pub use chain::{DEFAULT_BODY_LIMIT, HandlerFuture, Interceptor, Pipeline};
pub use context::{Reply, RequestCtx};
