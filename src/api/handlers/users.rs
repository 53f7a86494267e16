/*
 * Responsibility
 * - POST /user/register, POST /user/login
 * - body は ValidateBody stage で検証済み (ctx.validated_body で受け取る)
 * - bcrypt は blocking pool で実行
 */
use crate::api::dto::users::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::pipeline::{Reply, RequestCtx};
use crate::repos::{NewUser, RepoError};
use crate::services::password::{hash_blocking, verify_blocking};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "User with this email already exists";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn register(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let req: RegisterRequest = ctx.validated_body()?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::bad_request(EMAIL_TAKEN));
    }

    let password_hash = hash_blocking(state.hasher.clone(), req.password).await?;

    // a concurrent registration can still win the unique index
    let user = state
        .users
        .create(NewUser {
            email: req.email,
            password_hash,
            name: req.name,
        })
        .await
        .map_err(|e| match e {
            RepoError::Conflict(detail) => AppError::bad_request(EMAIL_TAKEN).with_detail(detail),
            other => other.into(),
        })?;

    let token = state.auth.issuer.issue(&user.id.to_string(), &user.email)?;
    tracing::info!(user_id = %user.id, "user registered");

    Reply::created(&AuthResponse {
        message: "User registered successfully",
        token,
        user: user.into(),
    })
}

pub async fn login(state: AppState, ctx: RequestCtx) -> Result<Reply, AppError> {
    let req: LoginRequest = ctx.validated_body()?;

    let Some(user) = state.users.find_by_email(&req.email).await? else {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS).with_detail("unknown email"));
    };

    let matches = verify_blocking(state.hasher.clone(), req.password, user.password.clone()).await?;
    if !matches {
        return Err(AppError::unauthorized(INVALID_CREDENTIALS).with_detail("password mismatch"));
    }

    let token = state.auth.issuer.issue(&user.id.to_string(), &user.email)?;

    Reply::ok(&AuthResponse {
        message: "Login successful",
        token,
        user: user.into(),
    })
}
