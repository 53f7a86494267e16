use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::AppError;
use crate::pipeline::{Interceptor, RequestCtx};
use crate::validation::Schema;

/// Checks the JSON body against a schema and stores the coerced result.
///
/// A request without a body is validated as `{}`, so required fields still
/// report `"<field>" is required`.
#[derive(Debug, Clone)]
pub struct ValidateBody {
    schema: Arc<Schema>,
}

impl ValidateBody {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }
}

impl Interceptor for ValidateBody {
    fn name(&self) -> &'static str {
        "validate_body"
    }

    fn intercept(&self, ctx: &mut RequestCtx) -> Result<(), AppError> {
        let empty = Value::Object(Map::new());
        let input = ctx.body().unwrap_or(&empty);
        let coerced = self.schema.validate(input)?;
        ctx.set_validated(coerced);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::validation::Field;
    use axum::http::{Method, Uri};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Input {
        name: String,
        order: i64,
        is_public: bool,
    }

    fn stage() -> ValidateBody {
        ValidateBody::new(
            Schema::new()
                .field(Field::string("name").required().max_len(255))
                .field(Field::integer("order").min(0).default(0))
                .field(Field::boolean("isPublic").default(true)),
        )
    }

    fn ctx() -> RequestCtx {
        RequestCtx::new(Method::POST, Uri::from_static("/service"))
    }

    #[test]
    fn coerced_body_reaches_the_context() {
        let mut ctx = ctx().with_body(json!({"name": "Cut", "order": "3", "extra": 1}));
        stage().intercept(&mut ctx).unwrap();

        let input: Input = ctx.validated_body().unwrap();
        assert_eq!(input.name, "Cut");
        assert_eq!(input.order, 3);
        assert!(input.is_public);
    }

    #[test]
    fn missing_body_reports_first_required_field() {
        let mut ctx = ctx();
        let err = stage().intercept(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.public_message(), "\"name\" is required");
    }

    #[test]
    fn non_object_body_is_rejected() {
        let mut ctx = ctx().with_body(json!([1, 2]));
        let err = stage().intercept(&mut ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
