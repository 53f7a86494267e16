//! Bearer credential verification.
//!
//! `authenticate` is a small state machine over one `Authorization` header:
//!
//! - no header / no second token       -> 401 "Access token required"
//! - credential present but not valid  -> 403 "Invalid or expired token"
//! - credential verifies               -> `Identity`
//!
//! Only HMAC algorithms are accepted, all against the same shared secret.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::error::AppError;
use crate::services::auth::identity::Identity;

pub const MISSING_TOKEN_MESSAGE: &str = "Access token required";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no bearer credential supplied")]
    MissingCredential,
    #[error("jwt verification failed: {0}")]
    InvalidCredential(#[from] jsonwebtoken::errors::Error),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingCredential => AppError::unauthorized(MISSING_TOKEN_MESSAGE),
            AuthError::InvalidCredential(_) => {
                AppError::forbidden(INVALID_TOKEN_MESSAGE).with_detail(e.to_string())
            }
        }
    }
}

/// Claims carried by an access token.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub email: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: Option<u64>,
}

/// Verifies HMAC-signed access tokens.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenAuthenticator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenAuthenticator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenAuthenticator {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // tokens carry no audience; exp is required by default
        validation.validate_aud = false;
        validation.leeway = leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Run the header through the credential state machine.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, AppError> {
        let token = bearer_credential(header)?;
        let claims = self.verify(token)?;

        Ok(Identity {
            subject_id: claims.user_id,
            email: claims.email,
        })
    }

    /// Verify signature + expiry and decode the claims.
    pub fn verify(&self, token: &str) -> Result<AccessTokenClaims, AuthError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}

/// Extract the credential: the second whitespace-separated token.
///
/// The scheme word is not checked. `Basic abc` yields `abc`, which then
/// fails verification (403) rather than counting as a missing credential.
pub fn bearer_credential(header: Option<&str>) -> Result<&str, AuthError> {
    let mut parts = header.ok_or(AuthError::MissingCredential)?.split_whitespace();

    match parts.nth(1) {
        Some(token) => Ok(token),
        None => Err(AuthError::MissingCredential),
    }
}
