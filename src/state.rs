/*
 * Responsibility
 * - Router / Pipeline に渡す共有コンテキスト (AppState)
 * - repo / hasher は trait object で持ち、テストではメモリ実装に差し替える
 * - Clone 前提 (中身は Arc / Copy)
 */
use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::ExposurePolicy;
use crate::repos::{PgServiceRepo, PgUserRepo, ServiceRepo, UserRepo};
use crate::services::auth::{AuthServices, build_auth_services};
use crate::services::password::{BcryptHasher, PasswordHasher};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub services: Arc<dyn ServiceRepo>,
    pub auth: AuthServices,
    pub hasher: Arc<dyn PasswordHasher>,
    pub exposure: ExposurePolicy,
}

impl AppState {
    /// Production wiring: Postgres repos, bcrypt at the configured cost.
    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        Self {
            users: Arc::new(PgUserRepo::new(pool.clone())),
            services: Arc::new(PgServiceRepo::new(pool)),
            auth: build_auth_services(config),
            hasher: Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            exposure: ExposurePolicy::for_env(config.app_env),
        }
    }
}

impl FromRef<AppState> for ExposurePolicy {
    fn from_ref(state: &AppState) -> Self {
        state.exposure
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("auth", &self.auth)
            .field("exposure", &self.exposure)
            .finish_non_exhaustive()
    }
}
