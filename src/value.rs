use std::collections::HashMap;

use crate::ast::Segment;

/// A JSON value: one semi-structured event record, or a piece of one.
///
/// This type represents all valid JSON types with a distinction between
/// integers and floats (unlike standard JSON which only has "number").
/// The engine only ever reads documents; projection builds new values and
/// never mutates the caller's input.
///
/// # Examples
///
/// ```
/// use mql::Value;
/// use std::collections::HashMap;
///
/// // Scalar values
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::Integer(42);
/// let float = Value::Float(3.14);
/// let string = Value::String("hello".to_string());
///
/// // Collections
/// let array = Value::Array(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut obj = HashMap::new();
/// obj.insert("key".to_string(), Value::String("value".to_string()));
/// let object = Value::Object(obj);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys
    Object(HashMap<String, Value>),
}

impl Value {
    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string slice, for strings only
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Resolve one path segment against this value.
    ///
    /// Mapping lookups go by key; list lookups by non-negative index. An
    /// integer segment against an object falls back to the decimal key
    /// (`{"1": ...}` resolves for `[1]`), matching how projection renders
    /// index segments. Missing keys, out-of-range or negative indices, and
    /// indexing into scalars all resolve to `None` — the "absent" sentinel.
    pub fn get_segment(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Value::Object(map), Segment::Key(k)) => map.get(k),
            (Value::Array(arr), Segment::Index(i)) => {
                // Negative indices are a documented gap, never resolved
                usize::try_from(*i).ok().and_then(|i| arr.get(i))
            }
            (Value::Object(map), Segment::Index(i)) => map.get(&i.to_string()),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(b),
            Value::Integer(n) => serde_json::Value::Number(n.into()),
            Value::Float(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(Into::into).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}
