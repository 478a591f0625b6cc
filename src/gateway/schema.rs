//! Tool parameter schemas
//!
//! A [`ToolSchema`] describes one tool: its name, description and ordered
//! parameter definitions. Schemas are declared in code at startup, are
//! immutable once registered and convert into MCP tool definitions for
//! `tools/list`.

use rust_mcp_sdk::schema::Tool as McpTool;

/// Kind of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// UTF-8 string
    String,
    /// true/false
    Boolean,
    /// JSON number (stored as f64)
    Number,
}

impl ParamKind {
    /// JSON Schema type name for this kind.
    #[must_use]
    pub fn json_type(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Number => "number",
        }
    }
}

/// Dynamically-typed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// String value
    Str(String),
    /// Boolean value
    Bool(bool),
    /// Numeric value
    Num(f64),
}

impl ParamValue {
    /// Kind of this value.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Str(_) => ParamKind::String,
            ParamValue::Bool(_) => ParamKind::Boolean,
            ParamValue::Num(_) => ParamKind::Number,
        }
    }

    /// Borrow the string value, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The boolean value, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The numeric value, if this is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Wire rendering used for path segments and query values.
    ///
    /// Integral numbers render without a fractional part so that e.g. a
    /// `limit` of 10 becomes `10`, not `10.0`.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            ParamValue::Str(s) => s.clone(),
            ParamValue::Bool(b) => b.to_string(),
            #[allow(clippy::cast_possible_truncation)]
            ParamValue::Num(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < 9e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Num(n)
    }
}

impl From<&ParamValue> for serde_json::Value {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Str(s) => serde_json::Value::String(s.clone()),
            ParamValue::Bool(b) => serde_json::Value::Bool(*b),
            ParamValue::Num(n) => serde_json::Number::from_f64(*n)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
        }
    }
}

/// Definition of a single tool parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name, unique within its schema.
    pub name: &'static str,
    /// Human-readable description, surfaced in the MCP tool definition.
    pub description: &'static str,
    /// Expected kind of the argument value.
    pub kind: ParamKind,
    /// Whether the caller must supply this argument.
    pub required: bool,
    /// Value substituted when an optional argument is absent.
    pub default: Option<ParamValue>,
    /// Allowed values for enum-constrained string parameters.
    pub allowed: Option<&'static [&'static str]>,
}

impl ParameterSpec {
    /// A required parameter. Required parameters cannot carry a default.
    #[must_use]
    pub fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
            required: true,
            default: None,
            allowed: None,
        }
    }

    /// An optional parameter without a default; when absent it is simply
    /// omitted from the bound arguments.
    #[must_use]
    pub fn optional(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            default: None,
            allowed: None,
        }
    }

    /// Attach a default value, substituted when the argument is absent.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Constrain a string parameter to an enumerated set of values.
    #[must_use]
    pub fn with_allowed(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

/// Schema of one tool: name, description and ordered parameter definitions.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    name: &'static str,
    description: &'static str,
    params: Vec<ParameterSpec>,
}

impl ToolSchema {
    /// Create a schema with no parameters yet.
    #[must_use]
    pub fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            params: Vec::new(),
        }
    }

    /// Append a parameter definition.
    ///
    /// Schemas are built once at startup; an inconsistent definition is a
    /// programming error and panics here rather than surfacing per call:
    /// duplicate parameter names, a default on a required parameter, a
    /// default outside the allowed set, or an enum constraint on a
    /// non-string parameter.
    #[must_use]
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        assert!(
            self.params.iter().all(|p| p.name != spec.name),
            "tool `{}`: duplicate parameter `{}`",
            self.name,
            spec.name
        );
        assert!(
            !(spec.required && spec.default.is_some()),
            "tool `{}`: required parameter `{}` cannot have a default",
            self.name,
            spec.name
        );
        if let Some(allowed) = spec.allowed {
            assert!(
                spec.kind == ParamKind::String,
                "tool `{}`: allowed values on non-string parameter `{}`",
                self.name,
                spec.name
            );
            if let Some(ParamValue::Str(default)) = &spec.default {
                assert!(
                    allowed.contains(&default.as_str()),
                    "tool `{}`: default `{}` of parameter `{}` is not an allowed value",
                    self.name,
                    default,
                    spec.name
                );
            }
        }
        self.params.push(spec);
        self
    }

    /// Tool name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tool description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Parameter definitions in declared order.
    #[must_use]
    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    /// Look up one parameter definition by name.
    #[must_use]
    pub fn param_spec(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// JSON Schema for this tool's arguments (`input_schema` of the MCP
    /// tool definition).
    #[must_use]
    pub fn input_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required: Vec<serde_json::Value> = Vec::new();

        for param in &self.params {
            let mut prop = serde_json::Map::new();
            prop.insert(
                "type".to_string(),
                serde_json::Value::String(param.kind.json_type().to_string()),
            );
            prop.insert(
                "description".to_string(),
                serde_json::Value::String(param.description.to_string()),
            );
            if let Some(allowed) = param.allowed {
                prop.insert(
                    "enum".to_string(),
                    serde_json::Value::Array(
                        allowed
                            .iter()
                            .map(|v| serde_json::Value::String((*v).to_string()))
                            .collect(),
                    ),
                );
            }
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.into());
            }
            properties.insert(param.name.to_string(), serde_json::Value::Object(prop));

            if param.required {
                required.push(serde_json::Value::String(param.name.to_string()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Convert into the MCP tool definition advertised via `tools/list`.
    ///
    /// Built through the wire representation so the conversion only depends
    /// on the protocol's field names, not on the SDK's struct layout.
    #[must_use]
    pub fn to_tool(&self) -> McpTool {
        let definition = serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        });

        // 模式在启动时构造，反序列化失败属于编程错误
        serde_json::from_value(definition).expect("tool definition matches the MCP schema")
    }
}
