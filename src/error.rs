/*
 * Responsibility
 * - アプリ共通の AppError (classified error) 定義
 * - ErrorKind → HTTP status の対応表
 * - 環境ごとのメッセージ公開ポリシー (ExposurePolicy)
 * - RepoError / AuthError などを AppError へ統一的に変換
 *
 * Response への変換は pipeline::boundary だけが行う (ここでは IntoResponse を実装しない)
 */
use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;

use crate::config::AppEnv;
use crate::repos::error::RepoError;

/// Message rendered for `Internal` errors when detail exposure is off.
pub const GENERIC_INTERNAL_MESSAGE: &str = "unknown error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// A failure tagged with exactly one [`ErrorKind`].
///
/// `public_message` is what a caller may see; `internal_detail` is for logs
/// and is only rendered when the [`ExposurePolicy`] allows it.
#[derive(Debug, Error)]
#[error("{}: {}", .kind.as_str(), .public_message)]
pub struct AppError {
    kind: ErrorKind,
    public_message: String,
    internal_detail: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, public_message: impl Into<String>) -> Self {
        Self {
            kind,
            public_message: public_message.into(),
            internal_detail: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Unexpected fault. The detail never reaches a production caller.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, GENERIC_INTERNAL_MESSAGE).with_detail(detail)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.internal_detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn public_message(&self) -> &str {
        &self.public_message
    }

    pub fn internal_detail(&self) -> Option<&str> {
        self.internal_detail.as_deref()
    }

    /// Message shown to the caller under `policy`.
    ///
    /// Client-error kinds always show their public message; detail is only
    /// ever swapped in for `Internal`.
    pub fn message_for(&self, policy: ExposurePolicy) -> &str {
        match self.kind {
            ErrorKind::Internal if policy.reveal_internal_detail => self
                .internal_detail()
                .unwrap_or(GENERIC_INTERNAL_MESSAGE),
            ErrorKind::Internal => GENERIC_INTERNAL_MESSAGE,
            _ => &self.public_message,
        }
    }

    pub fn to_body(&self, policy: ExposurePolicy) -> ErrorResponse {
        ErrorResponse {
            error: self.message_for(policy).to_string(),
        }
    }
}

/// Uniform error body: `{ "error": "<message>" }`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// What error detail is safe to reveal to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposurePolicy {
    pub reveal_internal_detail: bool,
}

impl ExposurePolicy {
    pub const PRODUCTION: Self = Self {
        reveal_internal_detail: false,
    };

    pub const DEVELOPMENT: Self = Self {
        reveal_internal_detail: true,
    };

    pub fn for_env(env: AppEnv) -> Self {
        if env.is_production() {
            Self::PRODUCTION
        } else {
            Self::DEVELOPMENT
        }
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        AppError::internal(format!("repository failure: {e}"))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal(format!("json serialization failed: {e}"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::internal(format!("blocking task failed: {e}"))
    }
}
