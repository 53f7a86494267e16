/*
 * Responsibility
 * - GET /health (疎通用、stage なし)
 * - どの route にも一致しない request の 404
 */
use serde_json::json;

use crate::error::AppError;
use crate::pipeline::{Reply, RequestCtx};
use crate::state::AppState;

pub async fn health(_state: AppState, _ctx: RequestCtx) -> Result<Reply, AppError> {
    Reply::ok(&json!({"status": "ok"}))
}

pub async fn not_found(_state: AppState, _ctx: RequestCtx) -> Result<Reply, AppError> {
    Err(AppError::not_found("Not found"))
}
