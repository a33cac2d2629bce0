//! Compile-time and assertion errors.

use thiserror::Error;

use crate::reason::ErrorReport;

/// Why a type could not be turned into a validator.
///
/// Type names in messages are rendered with `TypeFormatter`, so they read like
/// the source declaration (`Box<T>`, `{ a: number }`).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("unbound type parameter '{name}'")]
    UnboundTypeParameter { name: String },

    #[error("unsupported type '{type_name}': {detail}")]
    UnsupportedType { type_name: String, detail: String },

    #[error("index '{index}' does not exist on type '{type_name}'")]
    IndexDoesNotExist { type_name: String, index: String },

    #[error("classes are not supported (found '{name}'); enable ignore_classes to accept any value")]
    ClassNotSupported { name: String },

    #[error("cannot validate {context}: function types are not supported by function_behavior 'error'")]
    FunctionNotSupported { context: String },

    #[error("type instantiation of '{type_name}' is excessively deep and possibly infinite")]
    InstantiationTooDeep { type_name: String },

    #[error("type '{type_name}' circularly references itself")]
    CircularType { type_name: String },

    #[error("type id {0} is not in the type graph")]
    UnknownType(u32),
}

pub type Result<T> = std::result::Result<T, CompileError>;

/// Returned by [`assert_type`](crate::assert_type) when a value does not conform.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("{report}")]
pub struct AssertionError {
    pub report: ErrorReport,
}

impl From<ErrorReport> for AssertionError {
    fn from(report: ErrorReport) -> Self {
        Self { report }
    }
}
