//! Compiler options.

use serde::{Deserialize, Serialize};

/// How function-typed positions (the `Function` type and methods) are compiled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionBehavior {
    /// Refuse to compile; a function type cannot be checked structurally.
    #[default]
    Error,
    /// Accept any value.
    Ignore,
    /// Check only that the value is callable.
    Basic,
}

/// Options controlling how types are compiled.
///
/// Deserializes from the camelCase JSON used by `--config` files; every field
/// is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Replace the whole validator with one that accepts everything.
    pub short_circuit: bool,
    /// Accept any value where a user class type is expected.
    pub ignore_classes: bool,
    /// Skip method-typed properties entirely.
    pub ignore_methods: bool,
    pub function_behavior: FunctionBehavior,
    /// Exact mode: reject object keys the type does not declare.
    pub disallow_superfluous_properties: bool,
}

impl CompilerOptions {
    pub fn exact(mut self, exact: bool) -> Self {
        self.disallow_superfluous_properties = exact;
        self
    }

    pub fn with_function_behavior(mut self, behavior: FunctionBehavior) -> Self {
        self.function_behavior = behavior;
        self
    }
}
