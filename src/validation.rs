//! Declarative request-body validation.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Validation walks the fields
//! in declaration order and stops at the first violation, so a caller always
//! gets exactly one actionable message. Keys the schema does not declare are
//! dropped from the output.
//!
//! Messages follow the `"<field>" <constraint>` shape, e.g.
//! `"price" must be greater than or equal to 0`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;

#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Validate and coerce `input`, returning only declared fields.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, AppError> {
        let object = input
            .as_object()
            .ok_or_else(|| AppError::bad_request("\"value\" must be of type object"))?;

        let mut out = Map::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = field
                .check(object.get(field.name))
                .map_err(AppError::bad_request)?;
            if let Some(value) = value {
                out.insert(field.name.to_string(), value);
            }
        }

        Ok(out)
    }

    /// Validate, then deserialize the coerced object into `T`.
    ///
    /// A deserialization failure here means `T` and the schema disagree,
    /// which is a server bug rather than a caller mistake.
    pub fn validate_into<T: DeserializeOwned>(&self, input: &Value) -> Result<T, AppError> {
        let coerced = self.validate(input)?;
        serde_json::from_value(Value::Object(coerced)).map_err(|e| {
            AppError::internal(format!(
                "validated body does not fit {}: {e}",
                std::any::type_name::<T>()
            ))
        })
    }
}

#[derive(Debug, Clone)]
enum Presence {
    Optional,
    Required,
    Default(Value),
}

#[derive(Debug, Clone)]
enum Rule {
    String {
        min_len: Option<usize>,
        max_len: Option<usize>,
        allow_empty: bool,
        email: bool,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Boolean,
}

#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    rule: Rule,
    presence: Presence,
}

impl Field {
    pub fn string(name: &'static str) -> Self {
        Self::with_rule(
            name,
            Rule::String {
                min_len: None,
                max_len: None,
                allow_empty: false,
                email: false,
            },
        )
    }

    pub fn integer(name: &'static str) -> Self {
        Self::with_rule(
            name,
            Rule::Integer {
                min: None,
                max: None,
            },
        )
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::with_rule(name, Rule::Boolean)
    }

    fn with_rule(name: &'static str, rule: Rule) -> Self {
        Self {
            name,
            rule,
            presence: Presence::Optional,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    /// Value used only when the key is absent from the input.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.presence = Presence::Default(value.into());
        self
    }

    /// Lower bound for an integer field.
    pub fn min(mut self, bound: i64) -> Self {
        match &mut self.rule {
            Rule::Integer { min, .. } => *min = Some(bound),
            _ => debug_assert!(false, "`min` on non-integer field \"{}\"", self.name),
        }
        self
    }

    /// Upper bound for an integer field.
    pub fn max(mut self, bound: i64) -> Self {
        match &mut self.rule {
            Rule::Integer { max, .. } => *max = Some(bound),
            _ => debug_assert!(false, "`max` on non-integer field \"{}\"", self.name),
        }
        self
    }

    /// Minimum length in characters for a string field.
    pub fn min_len(mut self, bound: usize) -> Self {
        match &mut self.rule {
            Rule::String { min_len, .. } => *min_len = Some(bound),
            _ => debug_assert!(false, "`min_len` on non-string field \"{}\"", self.name),
        }
        self
    }

    /// Maximum length in characters for a string field.
    pub fn max_len(mut self, bound: usize) -> Self {
        match &mut self.rule {
            Rule::String { max_len, .. } => *max_len = Some(bound),
            _ => debug_assert!(false, "`max_len` on non-string field \"{}\"", self.name),
        }
        self
    }

    pub fn allow_empty(mut self) -> Self {
        match &mut self.rule {
            Rule::String { allow_empty, .. } => *allow_empty = true,
            _ => debug_assert!(false, "`allow_empty` on non-string field \"{}\"", self.name),
        }
        self
    }

    pub fn email(mut self) -> Self {
        match &mut self.rule {
            Rule::String { email, .. } => *email = true,
            _ => debug_assert!(false, "`email` on non-string field \"{}\"", self.name),
        }
        self
    }

    fn check(&self, raw: Option<&Value>) -> Result<Option<Value>, String> {
        let Some(raw) = raw else {
            return match &self.presence {
                Presence::Required => Err(format!("\"{}\" is required", self.name)),
                Presence::Default(value) => Ok(Some(value.clone())),
                Presence::Optional => Ok(None),
            };
        };

        match &self.rule {
            Rule::String {
                min_len,
                max_len,
                allow_empty,
                email,
            } => self
                .check_string(raw, *min_len, *max_len, *allow_empty, *email)
                .map(Some),
            Rule::Integer { min, max } => self.check_integer(raw, *min, *max).map(Some),
            Rule::Boolean => self.check_boolean(raw).map(Some),
        }
    }

    fn check_string(
        &self,
        raw: &Value,
        min_len: Option<usize>,
        max_len: Option<usize>,
        allow_empty: bool,
        email: bool,
    ) -> Result<Value, String> {
        let name = self.name;
        let s = raw
            .as_str()
            .ok_or_else(|| format!("\"{name}\" must be a string"))?;

        if s.is_empty() {
            return if allow_empty {
                Ok(Value::String(String::new()))
            } else {
                Err(format!("\"{name}\" is not allowed to be empty"))
            };
        }

        let len = s.chars().count();
        if let Some(min) = min_len
            && len < min
        {
            return Err(format!(
                "\"{name}\" length must be at least {min} characters long"
            ));
        }
        if let Some(max) = max_len
            && len > max
        {
            return Err(format!(
                "\"{name}\" length must be less than or equal to {max} characters long"
            ));
        }
        if email && !is_valid_email(s) {
            return Err(format!("\"{name}\" must be a valid email"));
        }

        Ok(Value::String(s.to_string()))
    }

    fn check_integer(
        &self,
        raw: &Value,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<Value, String> {
        let name = self.name;
        let n = match raw {
            Value::Number(n) => integer_from_number(n),
            // numeric strings are converted, as form posts send them
            Value::String(s) => integer_from_str(s.trim()),
            _ => Err(Numeric::NotANumber),
        }
        .map_err(|e| match e {
            Numeric::NotANumber => format!("\"{name}\" must be a number"),
            Numeric::NotAnInteger => format!("\"{name}\" must be an integer"),
        })?;

        if let Some(min) = min
            && n < min
        {
            return Err(format!(
                "\"{name}\" must be greater than or equal to {min}"
            ));
        }
        if let Some(max) = max
            && n > max
        {
            return Err(format!("\"{name}\" must be less than or equal to {max}"));
        }

        Ok(Value::from(n))
    }

    fn check_boolean(&self, raw: &Value) -> Result<Value, String> {
        match raw {
            Value::Bool(b) => Ok(Value::Bool(*b)),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(format!("\"{}\" must be a boolean", self.name)),
        }
    }
}

enum Numeric {
    NotANumber,
    NotAnInteger,
}

fn integer_from_number(n: &serde_json::Number) -> Result<i64, Numeric> {
    if let Some(i) = n.as_i64() {
        return Ok(i);
    }
    let f = n.as_f64().ok_or(Numeric::NotANumber)?;
    integer_from_f64(f)
}

fn integer_from_str(s: &str) -> Result<i64, Numeric> {
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    let f = s.parse::<f64>().map_err(|_| Numeric::NotANumber)?;
    if !f.is_finite() {
        return Err(Numeric::NotANumber);
    }
    integer_from_f64(f)
}

fn integer_from_f64(f: f64) -> Result<i64, Numeric> {
    // i64::MAX is not exactly representable; stay strictly inside the range
    if f.fract() != 0.0 || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(Numeric::NotAnInteger);
    }
    Ok(f as i64)
}

fn is_valid_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

    labels_ok && tld_ok
}
