use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Serialize)]
struct AccessTokenClaims<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    email: &'a str,
    iat: i64,
    exp: i64,
}

/// Signs access tokens with the shared HMAC secret.
#[derive(Clone)]
pub struct JwtIssuer {
    ttl_seconds: u64,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            ttl_seconds,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue an access token for `user_id` / `email`.
    pub fn issue(&self, user_id: &str, email: &str) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);

        let claims = AccessTokenClaims {
            user_id,
            email,
            iat: now,
            exp: now.saturating_add(ttl),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("failed to sign JWT: {e}")))
    }
}
