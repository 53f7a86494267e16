/*
 * Responsibility
 * - /service 系 handler
 *   - 公開: GET /service/all, GET /service/{id}
 *   - 要認証: POST /service, PUT /service/{id}, DELETE /service/{id}
 * - 認証 / body 検証は stage 側で済んでいる前提
 */
use uuid::Uuid;

use crate::api::dto::services::{
    CreateServiceRequest, MessageResponse, ServiceEnvelope, ServiceListResponse,
    ServiceMutationResponse, UpdateServiceRequest,
};
use crate::error::AppError;
use crate::pipeline::{Reply, RequestCtx};
use crate::state::AppState;

const SERVICE_NOT_FOUND: &str = "Service not found";

fn service_id(ctx: &RequestCtx) -> Result<Uuid, AppError> {
    let raw = ctx.param("id")?;
    Uuid::parse_str(raw).map_err(|e| {
        AppError::bad_request("\"id\" must be a valid GUID").with_detail(e.to_string())
    })
}

pub async fn list_public(state: AppState, _ctx: RequestCtx) -> Result<Reply, AppError> {
    let rows = state.services.list_public().await?;

    Reply::ok(&ServiceListResponse {
        services: rows.into_iter().map(Into::into).collect(),
    })
}

pub async fn get_public(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let id = service_id(&ctx)?;

    let row = state
        .services
        .find_public(id)
        .await?
        .ok_or_else(|| AppError::not_found(SERVICE_NOT_FOUND))?;

    Reply::ok(&ServiceEnvelope {
        service: row.into(),
    })
}

pub async fn create(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let identity = ctx.identity()?;
    let req: CreateServiceRequest = ctx.validated_body()?;

    let row = state.services.create(req.into()).await?;
    tracing::info!(service_id = %row.id, by = %identity.subject_id, "service created");

    Reply::created(&ServiceMutationResponse {
        message: "Service created successfully",
        service: row.into(),
    })
}

pub async fn update(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let identity = ctx.identity()?;
    let req: UpdateServiceRequest = ctx.validated_body()?;
    let id = service_id(&ctx)?;

    let row = state
        .services
        .update(id, req.into())
        .await?
        .ok_or_else(|| AppError::not_found(SERVICE_NOT_FOUND))?;
    tracing::info!(service_id = %row.id, by = %identity.subject_id, "service updated");

    Reply::ok(&ServiceMutationResponse {
        message: "Service updated successfully",
        service: row.into(),
    })
}

pub async fn delete(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let identity = ctx.identity()?;
    let id = service_id(&ctx)?;

    if !state.services.soft_delete(id).await? {
        return Err(AppError::not_found(SERVICE_NOT_FOUND));
    }
    tracing::info!(service_id = %id, by = %identity.subject_id, "service removed");

    Reply::ok(&MessageResponse {
        message: "Service deleted successfully",
    })
}
