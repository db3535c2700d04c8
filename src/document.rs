//! Document node helpers for expanded / compacted JSON-LD.
//!
//! Documents are plain `serde_json::Value` trees. JSON-LD allows every
//! attribute to appear either bare (`"action": {...}`) or wrapped in an array
//! (`"action": [{...}]`); the helpers in this module reconcile the two shapes
//! so conversion units never have to care which one they were given.

use serde_json::{Map, Value};

/// JSON-LD keyword for the node type discriminator.
pub const TYPE: &str = "@type";
/// JSON-LD keyword for the node identifier.
pub const ID: &str = "@id";
/// JSON-LD keyword for the literal value of a value object.
pub const VALUE: &str = "@value";
/// JSON-LD keyword for the context declaration.
pub const CONTEXT: &str = "@context";
/// JSON-LD keyword for an ordered list object.
pub const LIST: &str = "@list";

/// Normalize an attribute value into an ordered sequence.
///
/// * absent → empty slice
/// * array → its elements, in document order
/// * anything else (scalar, object, `null`) → one-element slice
///
/// Never allocates and never recurses.
///
/// # Example
/// ```
/// use ldpolicy::document::to_sequence;
/// use serde_json::json;
///
/// let bare = json!("use");
/// let wrapped = json!(["use"]);
/// assert_eq!(to_sequence(Some(&bare)), to_sequence(Some(&wrapped)));
/// assert!(to_sequence(None).is_empty());
/// ```
pub fn to_sequence(value: Option<&Value>) -> &[Value] {
    match value {
        None => &[],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => std::slice::from_ref(other),
    }
}

/// Normalized values of `name` on an object node.
///
/// Non-object nodes have no attributes and yield an empty slice.
pub fn attribute<'a>(node: &'a Value, name: &str) -> &'a [Value] {
    to_sequence(node.as_object().and_then(|object| object.get(name)))
}

/// Whether `node` is an object carrying attribute `name` (in any shape).
pub fn has_attribute(node: &Value, name: &str) -> bool {
    node.as_object().is_some_and(|object| object.contains_key(name))
}

/// First `@type` of an object node, if it is a string.
pub fn node_type(node: &Value) -> Option<&str> {
    attribute(node, TYPE).first().and_then(Value::as_str)
}

/// `@id` of an object node, if it is a string.
pub fn node_id(node: &Value) -> Option<&str> {
    attribute(node, ID).first().and_then(Value::as_str)
}

/// Read a string from a bare string or a `{"@value": ..}` / `{"@id": ..}` object.
///
/// Returns `Err` with a short description of the actual shape when the value
/// cannot be read as a string.
pub fn string_value(value: &Value) -> Result<&str, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Object(object) => object
            .get(VALUE)
            .or_else(|| object.get(ID))
            .and_then(Value::as_str)
            .ok_or_else(|| "expected string, got object".to_string()),
        other => Err(format!("expected string, got {}", kind_name(other))),
    }
}

/// Read a literal from a bare scalar or a `{"@value": ..}` object.
pub fn literal_value(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(value.clone()),
        Value::Object(object) => match object.get(VALUE) {
            Some(literal) if !literal.is_object() && !literal.is_array() => Ok(literal.clone()),
            _ => Err("expected literal, got object".to_string()),
        },
        other => Err(format!("expected literal, got {}", kind_name(other))),
    }
}

/// Human readable name of a node's shape, used in problem messages.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Nesting depth of a document; scalars have depth 0.
///
/// Boundaries use this to reject pathological documents before handing them
/// to the engine.
pub fn depth(value: &Value) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        Value::Object(object) => 1 + object.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}

/// Small builder for output objects, keeping insertion order.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    map: Map<String, Value>,
}

impl ObjectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an object with `@type` set.
    pub fn typed(type_name: &str) -> Self {
        Self::new().add(TYPE, Value::String(type_name.to_string()))
    }

    pub fn add(mut self, key: &str, value: Value) -> Self {
        self.map.insert(key.to_string(), value);
        self
    }

    /// Add a string attribute when present.
    pub fn add_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.add(key, Value::String(v.to_string())),
            None => self,
        }
    }

    /// Add an array attribute unless it is empty.
    pub fn add_list(self, key: &str, values: Vec<Value>) -> Self {
        if values.is_empty() {
            self
        } else {
            self.add(key, Value::Array(values))
        }
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}
