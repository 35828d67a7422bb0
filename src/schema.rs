//! Declarative schemas for request and model-output validation
//!
//! A schema is a static description of expected fields: name, kind,
//! optionality, and a prose description. The description is documentation
//! only, except that it is also forwarded to the generative backend as part
//! of the declared response schema.
//!
//! Validation is symmetric: the same machinery checks inbound requests
//! before a prompt is built and the model's structured output before it is
//! returned to the caller.

use crate::error::BucketListError;
use crate::Result;
use serde_json::{json, Map, Value};

/// Kind of a single schema field.
#[derive(Debug)]
pub enum FieldKind {
    /// A string, optionally bounded in length.
    Str {
        min_len: Option<usize>,
        max_len: Option<usize>,
    },
    /// An array of objects, each validated against the nested schema.
    ObjectArray(&'static Schema),
}

/// The unbounded string kind, by far the most common case.
pub const STR: FieldKind = FieldKind::Str {
    min_len: None,
    max_len: None,
};

#[derive(Debug)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub describe: &'static str,
}

#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl Schema {
    /// Validate `value` against this schema. On success, returns the value
    /// narrowed to the declared fields (undeclared fields are dropped, the
    /// input is never mutated). On mismatch, fails with a validation error
    /// naming the offending field path.
    pub fn validate(&self, value: &Value) -> Result<Value> {
        self.validate_at(value, "")
    }

    fn validate_at(&self, value: &Value, prefix: &str) -> Result<Value> {
        let object = value.as_object().ok_or_else(|| {
            BucketListError::validation(
                if prefix.is_empty() { self.name } else { prefix },
                "expected an object",
            )
        })?;

        let mut narrowed = Map::with_capacity(self.fields.len());

        for field in self.fields {
            let path = join_path(prefix, field.name);

            let candidate = match object.get(field.name) {
                Some(Value::Null) | None => {
                    if field.required {
                        return Err(BucketListError::validation(path, "missing required field"));
                    }
                    continue;
                }
                Some(v) => v,
            };

            let checked = match &field.kind {
                FieldKind::Str { min_len, max_len } => {
                    let s = candidate.as_str().ok_or_else(|| {
                        BucketListError::validation(&path, "expected a string")
                    })?;
                    if let Some(min) = min_len {
                        if s.chars().count() < *min {
                            return Err(BucketListError::validation(
                                &path,
                                format!("must be at least {} characters", min),
                            ));
                        }
                    }
                    if let Some(max) = max_len {
                        if s.chars().count() > *max {
                            return Err(BucketListError::validation(
                                &path,
                                format!("must be at most {} characters", max),
                            ));
                        }
                    }
                    Value::String(s.to_string())
                }
                FieldKind::ObjectArray(element) => {
                    let items = candidate.as_array().ok_or_else(|| {
                        BucketListError::validation(&path, "expected an array")
                    })?;
                    let mut checked_items = Vec::with_capacity(items.len());
                    for (i, item) in items.iter().enumerate() {
                        let item_path = format!("{}[{}]", path, i);
                        checked_items.push(element.validate_at(item, &item_path)?);
                    }
                    Value::Array(checked_items)
                }
            };

            narrowed.insert(field.name.to_string(), checked);
        }

        Ok(Value::Object(narrowed))
    }

    /// Render this schema as a Gemini `responseSchema` object so the backend
    /// is asked for exactly the declared shape.
    pub fn response_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in self.fields {
            let property = match &field.kind {
                FieldKind::Str { .. } => json!({
                    "type": "STRING",
                    "description": field.describe,
                }),
                FieldKind::ObjectArray(element) => json!({
                    "type": "ARRAY",
                    "description": field.describe,
                    "items": element.response_schema(),
                }),
            };
            properties.insert(field.name.to_string(), property);
            if field.required {
                required.push(Value::String(field.name.to_string()));
            }
        }

        json!({
            "type": "OBJECT",
            "properties": Value::Object(properties),
            "required": Value::Array(required),
        })
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
