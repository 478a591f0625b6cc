//! Argument validation and binding
//!
//! [`bind`] turns a caller-supplied argument object into [`BoundArguments`]:
//! every value type-checked against its [`ParameterSpec`], defaults
//! substituted for absent optional parameters, enum constraints enforced.
//! Pure function of its inputs; nothing here touches the network.

use crate::error::ToolError;
use crate::gateway::schema::{ParamKind, ParamValue, ToolSchema};
use std::collections::BTreeMap;

/// Validated, defaulted arguments ready for request construction.
///
/// Backed by a `BTreeMap` so iteration is lexicographic by parameter name;
/// request construction inherits that order and stays deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: BTreeMap<&'static str, ParamValue>,
}

impl BoundArguments {
    /// Look up a bound value by parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Look up a bound string value by parameter name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Whether a parameter was bound (explicitly or via default).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate bound values in lexicographic parameter-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameter is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validate `arguments` against `schema` and produce [`BoundArguments`].
///
/// Walks the schema's parameters in declared order. A present argument is
/// type-checked (and checked for enum membership); an absent required
/// argument is an error; an absent optional argument gets its default, or is
/// omitted when it has none. An explicit JSON `null` counts as absent.
/// Argument names not present in the schema are ignored so callers may pass
/// incidental metadata.
pub fn bind(
    schema: &ToolSchema,
    arguments: &serde_json::Value,
) -> Result<BoundArguments, ToolError> {
    let supplied = match arguments {
        serde_json::Value::Object(map) => Some(map),
        serde_json::Value::Null => None,
        _ => {
            return Err(ToolError::validation(
                "arguments",
                format!("expected a JSON object, got {}", json_type_name(arguments)),
            ))
        }
    };

    let mut bound = BoundArguments::default();
    for spec in schema.params() {
        let value = supplied
            .and_then(|map| map.get(spec.name))
            .filter(|v| !v.is_null());

        match value {
            Some(value) => {
                let value = coerce(spec.name, spec.kind, value)?;
                if let (Some(allowed), ParamValue::Str(s)) = (spec.allowed, &value) {
                    if !allowed.contains(&s.as_str()) {
                        return Err(ToolError::validation(
                            spec.name,
                            format!("`{}` is not one of {:?}", s, allowed),
                        ));
                    }
                }
                bound.values.insert(spec.name, value);
            }
            None if spec.required => {
                return Err(ToolError::validation(spec.name, "missing required argument"));
            }
            None => {
                if let Some(default) = &spec.default {
                    bound.values.insert(spec.name, default.clone());
                }
            }
        }
    }

    Ok(bound)
}

/// Check a supplied JSON value against the expected kind.
fn coerce(
    name: &'static str,
    kind: ParamKind,
    value: &serde_json::Value,
) -> Result<ParamValue, ToolError> {
    let mismatch = || {
        ToolError::validation(
            name,
            format!("expected {}, got {}", kind.json_type(), json_type_name(value)),
        )
    };

    match kind {
        ParamKind::String => value
            .as_str()
            .map(|s| ParamValue::Str(s.to_string()))
            .ok_or_else(mismatch),
        ParamKind::Boolean => value.as_bool().map(ParamValue::Bool).ok_or_else(mismatch),
        ParamKind::Number => value.as_f64().map(ParamValue::Num).ok_or_else(mismatch),
    }
}

/// JSON type name for error messages.
fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
