//! Bearer token の検証 → Identity を RequestCtx に載せる
//!
//! - `Authorization` ヘッダの抽出と検証は `TokenAuthenticator` に任せる
//! - 失敗時はここで応答を書かず、AppError を返して chain を止める

use std::sync::Arc;

use crate::error::AppError;
use crate::pipeline::{Interceptor, RequestCtx};
use crate::services::auth::TokenAuthenticator;

#[derive(Debug, Clone)]
pub struct Authenticate {
    authenticator: Arc<TokenAuthenticator>,
}

impl Authenticate {
    pub fn new(authenticator: Arc<TokenAuthenticator>) -> Self {
        Self { authenticator }
    }
}

impl Interceptor for Authenticate {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    fn intercept(&self, ctx: &mut RequestCtx) -> Result<(), AppError> {
        let identity = self.authenticator.authenticate(ctx.authorization())?;
        tracing::debug!(subject_id = %identity.subject_id, "authenticated");
        ctx.set_identity(identity);
        Ok(())
    }
}
