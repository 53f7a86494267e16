//! Per-request state shared by every stage of a pipeline.
//!
//! A `RequestCtx` is built once per request (headers, path params, parsed
//! JSON body), then handed mutably to each interceptor in turn and finally
//! moved into the handler. Nothing in it outlives the request.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequestParts, RawPathParams, Request, rejection::RawPathParamsRejection},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::services::auth::Identity;
use crate::services::auth::access_jwt::MISSING_TOKEN_MESSAGE;

#[derive(Debug)]
pub struct RequestCtx {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: HashMap<String, String>,
    body: Option<Value>,
    identity: Option<Identity>,
    validated: Option<Map<String, Value>>,
}

impl RequestCtx {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            params: HashMap::new(),
            body: None,
            identity: None,
            validated: None,
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Split an incoming request into a context.
    ///
    /// An empty body becomes `None`; anything else must be JSON.
    pub async fn from_request(req: Request, body_limit: usize) -> Result<Self, AppError> {
        let (mut parts, body) = req.into_parts();

        let params = match RawPathParams::from_request_parts(&mut parts, &()).await {
            Ok(raw) => raw
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Err(RawPathParamsRejection::InvalidUtf8InPathParam(e)) => {
                return Err(AppError::bad_request("invalid path parameter").with_detail(e.to_string()));
            }
            // fallback routes carry no params at all
            Err(_) => HashMap::new(),
        };

        let bytes = axum::body::to_bytes(body, body_limit).await.map_err(|e| {
            AppError::bad_request("request body is too large or unreadable")
                .with_detail(e.to_string())
        })?;

        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            let value = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                AppError::bad_request("invalid JSON body").with_detail(e.to_string())
            })?;
            Some(value)
        };

        Ok(Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            params,
            body,
            identity: None,
            validated: None,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn authorization(&self) -> Option<&str> {
        self.header(header::AUTHORIZATION)
    }

    /// A path parameter declared by the route.
    pub fn param(&self, name: &str) -> Result<&str, AppError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::internal(format!("route has no path parameter `{name}`")))
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Identity attached by the authenticate stage.
    pub fn identity(&self) -> Result<&Identity, AppError> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN_MESSAGE))
    }

    pub fn set_validated(&mut self, body: Map<String, Value>) {
        self.validated = Some(body);
    }

    /// Body coerced by the validation stage, as `T`.
    pub fn validated_body<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let body = self.validated.clone().ok_or_else(|| {
            AppError::internal("handler reads a validated body but the route has no validation stage")
        })?;

        serde_json::from_value(Value::Object(body)).map_err(|e| {
            AppError::internal(format!(
                "validated body does not fit {}: {e}",
                std::any::type_name::<T>()
            ))
        })
    }
}

/// Successful handler output. Written exactly once by the boundary.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: Value,
}

impl Reply {
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Result<Self, AppError> {
        Ok(Self {
            status,
            body: serde_json::to_value(body)?,
        })
    }

    pub fn ok<T: Serialize>(body: &T) -> Result<Self, AppError> {
        Self::json(StatusCode::OK, body)
    }

    pub fn created<T: Serialize>(body: &T) -> Result<Self, AppError> {
        Self::json(StatusCode::CREATED, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
