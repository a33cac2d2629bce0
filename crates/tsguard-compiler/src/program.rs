//! The compiled validator program.
//!
//! A program is a flat table of named validator functions. Bodies are small
//! [`Check`] trees whose only cross-function edge is [`Check::Call`], so
//! recursive types become recursive calls rather than infinite trees.

use serde::Serialize;

use tsguard_types::LiteralValue;

use crate::reason::{ErrorReport, Reason};
use crate::template::TemplatePattern;
use crate::value::Value;

/// Index of a validator function within its [`Program`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ValidatorId(pub u32);

/// A single-value test with no sub-structure.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Assertion {
    Null,
    Undefined,
    Boolean,
    Number,
    BigInt,
    String,
    /// Arrays, objects, functions and class instances.
    NonPrimitive,
    Date,
    Function,
    Literal(LiteralValue),
}

impl Assertion {
    pub fn holds(&self, value: &Value) -> bool {
        match self {
            Assertion::Null => matches!(value, Value::Null),
            Assertion::Undefined => value.is_undefined(),
            Assertion::Boolean => value.type_of() == "boolean",
            Assertion::Number => value.type_of() == "number",
            Assertion::BigInt => value.type_of() == "bigint",
            Assertion::String => value.type_of() == "string",
            Assertion::NonPrimitive => value.is_non_primitive(),
            Assertion::Date => matches!(value, Value::Date(_)),
            Assertion::Function => value.type_of() == "function",
            Assertion::Literal(LiteralValue::Boolean(expected)) => {
                matches!(value, Value::Bool(b) if b == expected)
            }
            // `===`: NaN never matches, 0 matches -0
            Assertion::Literal(LiteralValue::Number(expected)) => {
                matches!(value, Value::Number(n) if *n == expected.0)
            }
            Assertion::Literal(LiteralValue::String(expected)) => {
                matches!(value, Value::String(s) if s == expected)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCheck {
    pub name: String,
    pub optional: bool,
    pub check: Check,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectCheck {
    pub properties: Vec<PropertyCheck>,
    /// Applied to every own key.
    pub string_index: Option<Box<Check>>,
    /// Applied to every own key that is a canonical numeric name.
    pub number_index: Option<Box<Check>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleElementCheck {
    pub check: Check,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleCheck {
    pub min_length: usize,
    pub elements: Vec<TupleElementCheck>,
}

impl TupleCheck {
    pub fn max_length(&self) -> usize {
        self.elements.len()
    }
}

/// Validator body.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "check", rename_all = "camelCase")]
pub enum Check {
    Accept,
    Reject(Reason),
    Call(ValidatorId),
    Assert(Assertion, Reason),
    /// All must hold; the first failure is reported.
    Conjunction(Vec<Check>),
    /// At least one must hold; otherwise a single union failure at the
    /// current path.
    Disjunction(Vec<Check>),
    Object(ObjectCheck),
    Array(Box<Check>),
    Tuple(TupleCheck),
    Template(TemplatePattern),
    /// Object keys outside this sorted list are rejected; non-objects pass.
    Superfluous(Vec<String>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidatorFn {
    pub name: String,
    pub body: Check,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Program {
    functions: Vec<ValidatorFn>,
}

impl Program {
    pub(crate) fn from_functions(functions: Vec<ValidatorFn>) -> Self {
        Self { functions }
    }

    pub fn functions(&self) -> &[ValidatorFn] {
        &self.functions
    }

    /// Ids are only handed out by the compiler that built this program.
    pub fn function(&self, id: ValidatorId) -> &ValidatorFn {
        &self.functions[id.0 as usize]
    }

    pub fn find(&self, name: &str) -> Option<ValidatorId> {
        self.functions
            .iter()
            .position(|f| f.name == name)
            .map(|i| ValidatorId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Run the validator `root` against `value`.
    pub fn validate(&self, root: ValidatorId, value: &Value) -> Result<(), ErrorReport> {
        crate::eval::Evaluation::new(self).run_root(root, value)
    }
}

/// A compiled validator: a program plus the entry function for the root type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Validator {
    program: Program,
    root: ValidatorId,
}

impl Validator {
    pub(crate) fn new(program: Program, root: ValidatorId) -> Self {
        Self { program, root }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn root(&self) -> ValidatorId {
        self.root
    }

    pub fn root_name(&self) -> &str {
        &self.program.function(self.root).name
    }

    /// `Ok(())` on success, or the first failure found.
    pub fn validate(&self, value: &Value) -> Result<(), ErrorReport> {
        self.program.validate(self.root, value)
    }

    pub fn is(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }

    /// Render this validator as a standalone JavaScript module.
    pub fn to_javascript(&self) -> String {
        crate::emit::JsEmitter::new(&self.program).emit_module(&[self.root])
    }
}
