use serde_json::{Number, Value as JsonValue};
use thiserror::Error;

use crate::shape::IndexPath;
use crate::Tensor;

/// Errors produced while reading tensors from JSON.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("tensor json parse error: {0}")]
    Parse(String),
    #[error("expected a number or an array at {path}, found {found}")]
    NotNumeric { path: IndexPath, found: &'static str },
}

/// Parse a JSON document such as `[0, [1.5, 2]]` into a [`Tensor`].
pub fn parse_tensor(json: &str) -> Result<Tensor, JsonError> {
    let value: JsonValue =
        serde_json::from_str(json).map_err(|e| JsonError::Parse(e.to_string()))?;
    tensor_from_json(&value)
}

/// Convert an already-parsed JSON value, reporting the first non-numeric node
/// by its index path.
pub fn tensor_from_json(value: &JsonValue) -> Result<Tensor, JsonError> {
    from_json_at(value, &IndexPath::root())
}

fn from_json_at(value: &JsonValue, path: &IndexPath) -> Result<Tensor, JsonError> {
    match value {
        JsonValue::Number(n) => n.as_f64().map(Tensor::Scalar).ok_or_else(|| {
            JsonError::NotNumeric {
                path: path.clone(),
                found: "out-of-range number",
            }
        }),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| from_json_at(item, &path.child(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Tensor::Seq),
        other => Err(JsonError::NotNumeric {
            path: path.clone(),
            found: json_type_name(other),
        }),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Render a tensor as JSON. Non-finite leaves become `null`, as serde_json does.
pub fn tensor_to_json(tensor: &Tensor) -> JsonValue {
    match tensor {
        Tensor::Scalar(v) => Number::from_f64(*v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Tensor::Seq(items) => JsonValue::Array(items.iter().map(tensor_to_json).collect()),
    }
}
