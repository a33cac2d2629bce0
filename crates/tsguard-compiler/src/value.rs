//! Runtime values checked by compiled validators.
//!
//! `Value` models what a JavaScript host can hand to a validator: JSON data
//! plus `undefined`, bigints, dates, functions and class instances. Object
//! keys keep insertion order so superfluous-property and index-signature
//! failures report the first offending key deterministically.

use indexmap::IndexMap;
use std::sync::LazyLock;

/// Own enumerable properties of an object-like value.
pub type Fields = IndexMap<String, Value>;

static NO_FIELDS: LazyLock<Fields> = LazyLock::new(IndexMap::new);

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Array(Vec<Value>),
    Object(Fields),
    /// A `Date` instance, by its time value in milliseconds.
    Date(f64),
    /// A callable; the name is informational only.
    Function(String),
    /// An instance of a user class.
    Instance { class: String, fields: Fields },
}

impl Value {
    /// JavaScript `typeof` of this value.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null
            | Value::Array(_)
            | Value::Object(_)
            | Value::Date(_)
            | Value::Instance { .. } => "object",
        }
    }

    /// Fields of a value that passes the `typeof value === "object"`,
    /// non-null, non-array test. Dates have no own enumerable fields.
    pub fn object_fields(&self) -> Option<&Fields> {
        match self {
            Value::Object(fields) | Value::Instance { fields, .. } => Some(fields),
            Value::Date(_) => Some(&NO_FIELDS),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Anything that is not a primitive (`object` in TypeScript).
    pub fn is_non_primitive(&self) -> bool {
        match self.type_of() {
            "object" => !matches!(self, Value::Null),
            "function" => true,
            _ => false,
        }
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}
