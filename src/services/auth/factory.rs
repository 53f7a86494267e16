/// Factory: build the token services from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{JwtIssuer, TokenAuthenticator};

#[derive(Clone, Debug)]
pub struct AuthServices {
    pub authenticator: Arc<TokenAuthenticator>,
    pub issuer: Arc<JwtIssuer>,
}

pub fn build_auth_services(config: &Config) -> AuthServices {
    let authenticator = TokenAuthenticator::new(
        &config.jwt_secret,
        config.access_token_leeway_seconds,
    );
    let issuer = JwtIssuer::new(&config.jwt_secret, config.access_token_ttl_seconds);

    AuthServices {
        authenticator: Arc::new(authenticator),
        issuer: Arc::new(issuer),
    }
}
