/*
 * Responsibility
 * - URL 構造と、各 route の Pipeline (stage の順序) を定義
 *   - 認証が要る route: Authenticate → ValidateBody → handler
 * - 一致しない path / method は 404 {"error":"Not found"}
 */
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::dto::{
    services::{CreateServiceRequest, UpdateServiceRequest},
    users::{LoginRequest, RegisterRequest},
};
use crate::api::handlers::{health, services, users};
use crate::config::Config;
use crate::middleware::{Authenticate, ValidateBody};
use crate::pipeline::{Interceptor, Pipeline};
use crate::state::AppState;

pub fn routes(state: &AppState, config: &Config) -> Router<AppState> {
    let body_limit = config.body_limit_bytes;
    let endpoint = |pipeline: Pipeline<AppState>| pipeline.body_limit(body_limit).into_endpoint();

    let authenticate: Arc<dyn Interceptor> =
        Arc::new(Authenticate::new(Arc::clone(&state.auth.authenticator)));
    let not_found = endpoint(Pipeline::new(health::not_found));

    let register = Pipeline::new(users::register).stage(ValidateBody::new(RegisterRequest::schema()));
    let login = Pipeline::new(users::login).stage(ValidateBody::new(LoginRequest::schema()));

    let create_service = Pipeline::new(services::create)
        .shared_stage(Arc::clone(&authenticate))
        .stage(ValidateBody::new(CreateServiceRequest::schema()));
    let update_service = Pipeline::new(services::update)
        .shared_stage(Arc::clone(&authenticate))
        .stage(ValidateBody::new(UpdateServiceRequest::schema()));
    let delete_service = Pipeline::new(services::delete).shared_stage(authenticate);

    Router::new()
        .route(
            "/health",
            get(endpoint(Pipeline::new(health::health))).fallback(not_found.clone()),
        )
        .route(
            "/user/register",
            post(endpoint(register)).fallback(not_found.clone()),
        )
        .route(
            "/user/login",
            post(endpoint(login)).fallback(not_found.clone()),
        )
        .route(
            "/service",
            post(endpoint(create_service)).fallback(not_found.clone()),
        )
        .route(
            "/service/all",
            get(endpoint(Pipeline::new(services::list_public))).fallback(not_found.clone()),
        )
        .route(
            "/service/{id}",
            get(endpoint(Pipeline::new(services::get_public)))
                .put(endpoint(update_service))
                .delete(endpoint(delete_service))
                .fallback(not_found.clone()),
        )
        .fallback(not_found)
}
