/*
 * Responsibility
 * - パスワードの hash / verify を trait として切り出す
 * - 実装は bcrypt (cost は Config から)
 * - CPU を食う処理なので、呼び出し側は spawn_blocking で実行する
 */
use std::sync::Arc;

use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<PasswordError> for AppError {
    fn from(e: PasswordError) -> Self {
        AppError::internal(e.to_string())
    }
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> Result<String, PasswordError>;

    // Ok(false) for a well-formed hash that does not match.
    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError>;
}

#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plain: &str) -> Result<String, PasswordError> {
        Ok(bcrypt::hash(plain, self.cost)?)
    }

    fn verify(&self, plain: &str, hash: &str) -> Result<bool, PasswordError> {
        Ok(bcrypt::verify(plain, hash)?)
    }
}

/// Hash on the blocking pool so in-flight requests keep running.
pub async fn hash_blocking(
    hasher: Arc<dyn PasswordHasher>,
    plain: String,
) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&plain)).await??;
    Ok(hashed)
}

/// Verify on the blocking pool.
pub async fn verify_blocking(
    hasher: Arc<dyn PasswordHasher>,
    plain: String,
    hash: String,
) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash)).await??;
    Ok(matches)
}
