//! Category dispatch.
//!
//! `build_type_check` is the single place a type's category decides how it
//! is validated. The match is exhaustive over `TypeData`, so a new category
//! is a compile error here rather than a silent fallthrough. Arms are listed
//! in resolution priority order.

use tracing::trace;

use tsguard_types::{
    BuiltinClass, DefKind, IntrinsicKind, LiteralValue, TypeApplication, TypeData, TypeId,
};

use crate::combinators::{accept, assert, call, literal, reject};
use crate::context::{Mode, VisitorContext};
use crate::error::{CompileError, Result};
use crate::options::FunctionBehavior;
use crate::program::{Assertion, Check};
use crate::reason::Reason;

impl<'g> VisitorContext<'g> {
    pub(crate) fn build(&mut self, type_id: TypeId, mode: &Mode, open: bool) -> Result<Check> {
        match mode {
            Mode::TypeCheck => self.build_type_check(type_id, open),
            Mode::KeyOf => self.build_keyof(type_id),
            Mode::IndexedAccess(index) => self.build_indexed_access(type_id, index),
        }
    }

    fn build_type_check(&mut self, type_id: TypeId, open: bool) -> Result<Check> {
        match self.lookup(type_id)? {
            TypeData::Intrinsic(
                kind @ (IntrinsicKind::Any
                | IntrinsicKind::Unknown
                | IntrinsicKind::Never
                | IntrinsicKind::Null
                | IntrinsicKind::Undefined
                | IntrinsicKind::Number
                | IntrinsicKind::Bigint
                | IntrinsicKind::Boolean
                | IntrinsicKind::String),
            ) => Ok(primitive(kind)),
            TypeData::Literal(value @ LiteralValue::Boolean(_)) => Ok(literal(value)),
            TypeData::Reference(app) => self.build_reference(type_id, &app, open),
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(type_id)?;
                trace!(param = %self.format(type_id), bound = %self.format(binding.type_id), "type parameter");
                let id = self.with_frame(binding.env, |cx| {
                    cx.compile_with(binding.type_id, Mode::TypeCheck, open)
                })?;
                Ok(call(id))
            }
            TypeData::Object(shape) => self.build_object_shape(shape, open),
            TypeData::Array(element) => self.build_array(element),
            TypeData::Tuple(list) => self.build_tuple(list),
            TypeData::Literal(value) => Ok(literal(value)),
            TypeData::Union(list) => self.build_union(list, open),
            TypeData::Intersection(list) => self.build_intersection(list, open),
            TypeData::Intrinsic(IntrinsicKind::Object) => {
                Ok(assert(Assertion::NonPrimitive, Reason::NonPrimitive))
            }
            TypeData::Intrinsic(IntrinsicKind::Function) => {
                self.function_check("function type".to_string())
                    .map(|check| check.unwrap_or_else(accept))
            }
            TypeData::KeyOf(operand) => Ok(call(self.compile(operand, Mode::KeyOf)?)),
            TypeData::IndexAccess(object, index) => {
                let keys = self.index_key_set(index)?;
                Ok(call(self.compile(object, Mode::IndexedAccess(keys))?))
            }
            TypeData::TemplateLiteral(_) => self.build_template_literal(type_id),
        }
    }

    fn build_reference(
        &mut self,
        type_id: TypeId,
        app: &TypeApplication,
        open: bool,
    ) -> Result<Check> {
        let def = self.definition(app.def)?;
        match def.kind {
            DefKind::Class => {
                if def.builtin == Some(BuiltinClass::Date) {
                    return Ok(assert(Assertion::Date, Reason::Date));
                }
                if self.options.ignore_classes {
                    return Ok(accept());
                }
                Err(CompileError::ClassNotSupported { name: def.name })
            }
            DefKind::TypeAlias => {
                let Some(body) = def.body else {
                    return Err(self.unsupported(type_id, "type alias has no definition"));
                };
                let env = self.substitution_for(app)?;
                let id = self.instantiate(type_id, env, |cx| {
                    cx.compile_with(body, Mode::TypeCheck, open)
                })?;
                Ok(call(id))
            }
            DefKind::Interface => {
                let env = self.substitution_for(app)?;
                self.instantiate(type_id, env, |cx| {
                    let members = cx.members_of_declaration(app.def)?;
                    cx.build_members(&members, open)
                })
            }
        }
    }

    /// Check for a function-typed position under the configured
    /// `function_behavior`. `None` means the position is not checked at all.
    pub(crate) fn function_check(&self, context: String) -> Result<Option<Check>> {
        match self.options.function_behavior {
            FunctionBehavior::Error => Err(CompileError::FunctionNotSupported { context }),
            FunctionBehavior::Ignore => Ok(None),
            FunctionBehavior::Basic => Ok(Some(assert(Assertion::Function, Reason::Function))),
        }
    }
}

fn primitive(kind: IntrinsicKind) -> Check {
    match kind {
        IntrinsicKind::Any | IntrinsicKind::Unknown => accept(),
        IntrinsicKind::Never => reject(Reason::Never),
        IntrinsicKind::Null => assert(Assertion::Null, Reason::Null),
        IntrinsicKind::Undefined => assert(Assertion::Undefined, Reason::Undefined),
        IntrinsicKind::Number => assert(Assertion::Number, Reason::Number),
        IntrinsicKind::Bigint => assert(Assertion::BigInt, Reason::BigInt),
        IntrinsicKind::Boolean => assert(Assertion::Boolean, Reason::Boolean),
        IntrinsicKind::String => assert(Assertion::String, Reason::String),
        IntrinsicKind::Object => assert(Assertion::NonPrimitive, Reason::NonPrimitive),
        IntrinsicKind::Function => assert(Assertion::Function, Reason::Function),
    }
}
