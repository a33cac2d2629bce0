//! Type-to-validator compiler.
//!
//! Turns a type from a [`TypeGraph`](tsguard_types::TypeGraph) into a
//! [`Validator`]: a table of named validator functions that check runtime
//! [`Value`]s against the type and report the first failure with its path.
//!
//! - **Memoization**: one validator per (type, mode, type arguments), reserved
//!   before its body is built, so recursive types compile to recursive calls
//! - **Generics**: type arguments, defaults and inherited parameters resolve
//!   through interned environments
//! - **Set algebra**: `keyof` and indexed access over tri-state literal sets
//! - **Exact mode**: superfluous-property rejection that is intersection aware
//! - **Emission**: the same program rendered as a JavaScript module
//!
//! ```
//! use tsguard_compiler::{CompilerOptions, Value, compile};
//! use tsguard_types::{PropertyInfo, TypeGraph, TypeId};
//!
//! let mut graph = TypeGraph::new();
//! let point = graph.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
//! let validator = compile(&graph, point, &CompilerOptions::default()).unwrap();
//!
//! assert!(validator.is(&Value::object([("x", Value::Number(1.0))])));
//! let report = validator.validate(&Value::object([("x", Value::from("1"))])).unwrap_err();
//! assert_eq!(report.path, ["$", "x"]);
//! ```

mod api;
mod builders;
pub mod combinators;
mod compiler;
mod context;
mod dispatch;
pub mod emit;
pub mod error;
mod eval;
mod generics;
pub mod options;
pub mod program;
pub mod reason;
pub mod recursion;
pub mod set_algebra;
pub mod template;
pub mod value;

pub use api::{assert_type, compile, equals, is};
pub use compiler::Compiler;
pub use context::{Mode, ValidatorKey};
pub use emit::JsEmitter;
pub use error::{AssertionError, CompileError, Result};
pub use generics::{Binding, EnvId};
pub use options::{CompilerOptions, FunctionBehavior};
pub use program::{Assertion, Check, Program, Validator, ValidatorFn, ValidatorId};
pub use reason::{ErrorReport, Reason, render_path};
pub use set_algebra::{KeySet, LiteralSet};
pub use template::{Placeholder, TemplatePattern, TemplateSegment};
pub use value::{Fields, Value};

#[cfg(test)]
#[path = "../tests/generics_tests.rs"]
mod generics_tests;

#[cfg(test)]
#[path = "../tests/scenario_tests.rs"]
mod scenario_tests;
