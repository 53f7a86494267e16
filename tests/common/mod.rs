//! Shared fixtures for router-level tests: in-memory repos and a request helper.
#![allow(dead_code)]

use std::sync::Arc;

use appointment_api::{
    app::build_router,
    config::{AppEnv, Config},
    error::ExposurePolicy,
    repos::{NewService, NewUser, RepoError, ServicePatch, ServiceRepo, ServiceRow, UserRepo, UserRow},
    services::{
        auth::{JwtIssuer, build_auth_services},
        password::BcryptHasher,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<Vec<UserRow>>,
}

impl MemoryUsers {
    pub async fn count(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn stored_password(&self, email: &str) -> Option<String> {
        let rows = self.rows.lock().await;
        rows.iter().find(|u| u.email == email).map(|u| u.password.clone())
    }
}

#[async_trait]
impl UserRepo for MemoryUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, RepoError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<UserRow, RepoError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Conflict("Users_email_key".to_string()));
        }

        let now = Utc::now();
        let row = UserRow {
            id: Uuid::new_v4(),
            email: user.email,
            password: user.password_hash,
            name: user.name,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryServices {
    rows: Mutex<Vec<ServiceRow>>,
}

impl MemoryServices {
    pub async fn count(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<ServiceRow> {
        let rows = self.rows.lock().await;
        rows.iter().find(|s| s.id == id).cloned()
    }

    /// Insert directly, bypassing the API (e.g. private rows).
    pub async fn seed(&self, name: &str, order: i32, is_public: bool) -> Uuid {
        let row = self
            .create(NewService {
                name: name.to_string(),
                description: None,
                price: 100,
                show_time: None,
                order,
                is_public,
            })
            .await
            .unwrap();
        row.id
    }
}

#[async_trait]
impl ServiceRepo for MemoryServices {
    async fn list_public(&self) -> Result<Vec<ServiceRow>, RepoError> {
        let rows = self.rows.lock().await;
        let mut visible: Vec<ServiceRow> = rows
            .iter()
            .filter(|s| s.is_public && !s.is_remove)
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(visible)
    }

    async fn find_public(&self, id: Uuid) -> Result<Option<ServiceRow>, RepoError> {
        let rows = self.rows.lock().await;
        Ok(rows
            .iter()
            .find(|s| s.id == id && s.is_public && !s.is_remove)
            .cloned())
    }

    async fn create(&self, service: NewService) -> Result<ServiceRow, RepoError> {
        let mut rows = self.rows.lock().await;
        // strictly increasing timestamps keep "newest first" deterministic
        let now = Utc::now() + Duration::seconds(rows.len() as i64);
        let row = ServiceRow {
            id: Uuid::new_v4(),
            name: service.name,
            description: service.description,
            price: service.price,
            show_time: service.show_time,
            order: service.order,
            is_remove: false,
            is_public: service.is_public,
            created_at: now,
            updated_at: now,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: Uuid,
        patch: ServicePatch,
    ) -> Result<Option<ServiceRow>, RepoError> {
        let mut rows = self.rows.lock().await;
        let Some(row) = rows.iter_mut().find(|s| s.id == id && !s.is_remove) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            row.name = name;
        }
        if let Some(description) = patch.description {
            row.description = Some(description);
        }
        if let Some(price) = patch.price {
            row.price = price;
        }
        if let Some(show_time) = patch.show_time {
            row.show_time = Some(show_time);
        }
        if let Some(order) = patch.order {
            row.order = order;
        }
        if let Some(is_public) = patch.is_public {
            row.is_public = is_public;
        }
        row.updated_at = Utc::now();

        Ok(Some(row.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut rows = self.rows.lock().await;
        match rows.iter_mut().find(|s| s.id == id && !s.is_remove) {
            Some(row) => {
                row.is_remove = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Every call fails like a dropped connection pool.
pub struct BrokenServices;

#[async_trait]
impl ServiceRepo for BrokenServices {
    async fn list_public(&self) -> Result<Vec<ServiceRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn find_public(&self, _id: Uuid) -> Result<Option<ServiceRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _service: NewService) -> Result<ServiceRow, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn update(
        &self,
        _id: Uuid,
        _patch: ServicePatch,
    ) -> Result<Option<ServiceRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn soft_delete(&self, _id: Uuid) -> Result<bool, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
}

pub fn config(app_env: AppEnv) -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env,
        database_url: "postgres://unused".to_string(),
        cors_allowed_origins: Vec::new(),
        jwt_secret: SECRET.to_string(),
        access_token_ttl_seconds: 86_400,
        access_token_leeway_seconds: 0,
        bcrypt_cost: 4,
        body_limit_bytes: 16 * 1024,
    }
}

pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUsers>,
    pub services: Arc<MemoryServices>,
}

pub fn app() -> TestApp {
    app_in(AppEnv::Production)
}

pub fn app_in(app_env: AppEnv) -> TestApp {
    let users = Arc::new(MemoryUsers::default());
    let services = Arc::new(MemoryServices::default());
    let router = router_with(app_env, users.clone(), services.clone());

    TestApp {
        router,
        users,
        services,
    }
}

pub fn router_with(
    app_env: AppEnv,
    users: Arc<dyn UserRepo>,
    services: Arc<dyn ServiceRepo>,
) -> Router {
    let config = config(app_env);
    let state = AppState {
        users,
        services,
        auth: build_auth_services(&config),
        hasher: Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        exposure: ExposurePolicy::for_env(app_env),
    };
    build_router(state, &config)
}

/// A valid token for an arbitrary user.
pub fn token() -> String {
    JwtIssuer::new(SECRET, 3600)
        .issue(&Uuid::new_v4().to_string(), "admin@example.com")
        .unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = authorization {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    send_raw(router, builder.body(body).unwrap()).await
}

pub async fn send_raw(router: &Router, req: Request<Body>) -> TestResponse {
    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
