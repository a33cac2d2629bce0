//! One-call entry points.

use tsguard_types::{TypeGraph, TypeId};

use crate::compiler::Compiler;
use crate::error::{AssertionError, Result};
use crate::options::CompilerOptions;
use crate::program::Validator;
use crate::value::Value;

/// Compile `root` into a standalone validator.
pub fn compile(graph: &TypeGraph, root: TypeId, options: &CompilerOptions) -> Result<Validator> {
    let mut compiler = Compiler::new(graph, options.clone());
    let id = compiler.compile_root(root)?;
    Ok(Validator::new(compiler.finish(), id))
}

/// Like [`compile`], with superfluous-property checking forced on.
pub fn equals(graph: &TypeGraph, root: TypeId, options: &CompilerOptions) -> Result<Validator> {
    compile(graph, root, &options.clone().exact(true))
}

/// Whether `value` conforms.
pub fn is(validator: &Validator, value: &Value) -> bool {
    validator.is(value)
}

/// `Ok(())` if `value` conforms, otherwise the failure as an error.
pub fn assert_type(validator: &Validator, value: &Value) -> std::result::Result<(), AssertionError> {
    validator.validate(value).map_err(AssertionError::from)
}
