//! Validation failure reasons and the report returned to callers.

use serde::Serialize;
use std::fmt;

use tsguard_types::utils::js_number_to_string;

/// Why a value was rejected.
///
/// Serializes as `{"type": "missing-property", "property": "a"}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Reason {
    Object,
    Array,
    Tuple {
        #[serde(rename = "minLength")]
        min_length: usize,
        #[serde(rename = "maxLength")]
        max_length: usize,
    },
    MissingProperty {
        property: String,
    },
    SuperfluousProperty {
        property: String,
    },
    Never,
    Union,
    String,
    Number,
    Boolean,
    #[serde(rename = "bigint")]
    BigInt,
    Null,
    Undefined,
    StringLiteral {
        value: String,
    },
    NumberLiteral {
        value: f64,
    },
    BooleanLiteral {
        value: bool,
    },
    NonPrimitive,
    Date,
    Function,
    TemplateLiteral {
        pattern: String,
    },
}

impl Reason {
    /// Human-readable expectation, e.g. "expected a number".
    pub fn expectation(&self) -> String {
        match self {
            Reason::Object => "expected an object".to_string(),
            Reason::Array => "expected an array".to_string(),
            Reason::Tuple {
                min_length,
                max_length,
            } => {
                if min_length == max_length {
                    format!("expected an array with length {max_length}")
                } else {
                    format!("expected an array with length {min_length}-{max_length}")
                }
            }
            Reason::MissingProperty { property } => format!("expected '{property}' in object"),
            Reason::SuperfluousProperty { property } => {
                format!("superfluous property '{property}' in object")
            }
            Reason::Never => "type is never".to_string(),
            Reason::Union => "there are no valid alternatives".to_string(),
            Reason::String => "expected a string".to_string(),
            Reason::Number => "expected a number".to_string(),
            Reason::Boolean => "expected a boolean".to_string(),
            Reason::BigInt => "expected a bigint".to_string(),
            Reason::Null => "expected null".to_string(),
            Reason::Undefined => "expected undefined".to_string(),
            Reason::StringLiteral { value } => format!("expected string '{value}'"),
            Reason::NumberLiteral { value } => {
                format!("expected number {}", js_number_to_string(*value))
            }
            Reason::BooleanLiteral { value } => format!("expected {value}"),
            Reason::NonPrimitive => "expected a non-primitive".to_string(),
            Reason::Date => "expected a Date".to_string(),
            Reason::Function => "expected a function".to_string(),
            Reason::TemplateLiteral { pattern } => {
                format!("expected string to match pattern {pattern}")
            }
        }
    }
}

/// The first failure found while validating a value.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorReport {
    pub message: String,
    /// Root-first path: `["$", "a", "[1]"]`.
    pub path: Vec<String>,
    pub reason: Reason,
}

impl ErrorReport {
    pub fn new(path: Vec<String>, reason: Reason) -> Self {
        let message = format!(
            "validation failed at {}: {}",
            render_path(&path),
            reason.expectation()
        );
        Self {
            message,
            path,
            reason,
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// `["$", "a", "[1]"]` -> `$.a[1]`
pub fn render_path(path: &[String]) -> String {
    let mut out = String::new();
    for (i, segment) in path.iter().enumerate() {
        if i > 0 && !segment.starts_with('[') {
            out.push('.');
        }
        out.push_str(segment);
    }
    out
}

/// The path under construction during one validation call.
///
/// Each top-level `validate` owns its own stack, so nested or concurrent calls
/// never see each other's segments.
#[derive(Debug)]
pub(crate) struct PathStack {
    segments: Vec<String>,
}

impl PathStack {
    pub(crate) fn new() -> Self {
        Self {
            segments: vec!["$".to_string()],
        }
    }

    pub(crate) fn push_key(&mut self, key: &str) {
        self.segments.push(key.to_string());
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.segments.push(format!("[{index}]"));
    }

    pub(crate) fn pop(&mut self) {
        debug_assert!(self.segments.len() > 1, "popped the root path segment");
        if self.segments.len() > 1 {
            self.segments.pop();
        }
    }

    pub(crate) fn report(&self, reason: Reason) -> ErrorReport {
        ErrorReport::new(self.segments.clone(), reason)
    }
}
