//! Compilation context: the validator table, memo and environment stack.
//!
//! Every validator is memoized under a [`ValidatorKey`]. A key is reserved
//! (named and inserted into the memo) *before* its body is built, so a type
//! that reaches itself while its body is under construction finds the
//! reservation and emits a call instead of recursing.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use tsguard_types::{
    DefId, DefinitionInfo, TemplateSpan, TypeData, TypeFormatter, TypeGraph, TypeId, TypeParamInfo,
};

use crate::error::{CompileError, Result};
use crate::generics::{EnvId, EnvStore};
use crate::options::CompilerOptions;
use crate::program::{Check, Program, ValidatorFn, ValidatorId};
use crate::recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
use crate::set_algebra::KeySet;

/// What a validator checks about its type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The value conforms to the type.
    TypeCheck,
    /// The value is one of the type's keys.
    KeyOf,
    /// The value conforms to the type's property types at these keys.
    IndexedAccess(KeySet),
}

/// Memo key: one validator per distinct key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValidatorKey {
    pub type_id: TypeId,
    pub mode: Mode,
    /// `EnvId::ROOT` for types that mention no type parameters.
    pub env: EnvId,
    /// Compiled as an intersection member: superfluous keys are checked by
    /// the intersection, not by this validator.
    pub open: bool,
}

#[derive(Debug)]
struct Slot {
    name: String,
    body: Option<Check>,
}

/// Marks the table state before a root compile so a failure can be undone.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Checkpoint {
    slots: usize,
}

impl Checkpoint {
    pub(crate) fn slots(self) -> usize {
        self.slots
    }
}

pub(crate) struct VisitorContext<'g> {
    pub(crate) graph: &'g TypeGraph,
    pub(crate) options: CompilerOptions,
    slots: Vec<Slot>,
    memo: FxHashMap<ValidatorKey, ValidatorId>,
    name_counts: FxHashMap<String, u32>,
    pub(crate) envs: EnvStore,
    frames: Vec<EnvId>,
    open_types: FxHashMap<TypeId, bool>,
    instantiation_depth: DepthCounter,
    alias_guard: RecursionGuard<(TypeId, EnvId)>,
}

impl<'g> VisitorContext<'g> {
    pub(crate) fn new(graph: &'g TypeGraph, options: CompilerOptions) -> Self {
        Self {
            graph,
            options,
            slots: Vec::new(),
            memo: FxHashMap::default(),
            name_counts: FxHashMap::default(),
            envs: EnvStore::new(),
            frames: Vec::new(),
            open_types: FxHashMap::default(),
            instantiation_depth: DepthCounter::with_profile(RecursionProfile::TypeApplication),
            alias_guard: RecursionGuard::with_profile(RecursionProfile::SetAlgebra),
        }
    }

    // -------------------------------------------------------------------------
    // Graph access
    // -------------------------------------------------------------------------

    pub(crate) fn lookup(&self, type_id: TypeId) -> Result<TypeData> {
        self.graph
            .lookup(type_id)
            .cloned()
            .ok_or(CompileError::UnknownType(type_id.0))
    }

    pub(crate) fn definition(&self, def: DefId) -> Result<DefinitionInfo> {
        self.graph
            .definition(def)
            .cloned()
            .ok_or_else(|| CompileError::UnsupportedType {
                type_name: format!("<declaration {}>", def.0),
                detail: "declaration is not in the type graph".to_string(),
            })
    }

    pub(crate) fn type_param(&self, param: TypeId) -> Result<TypeParamInfo> {
        self.graph
            .type_param_info(param)
            .cloned()
            .ok_or(CompileError::UnknownType(param.0))
    }

    pub(crate) fn format(&self, type_id: TypeId) -> String {
        TypeFormatter::new(self.graph).format(type_id)
    }

    pub(crate) fn unsupported(&self, type_id: TypeId, detail: &str) -> CompileError {
        CompileError::UnsupportedType {
            type_name: self.format(type_id),
            detail: detail.to_string(),
        }
    }

    /// Whether `type_id` mentions a type parameter anywhere outside a
    /// declaration body. Memoized; references are only looked through via
    /// their arguments, so this never loops.
    pub(crate) fn contains_type_parameters(&mut self, type_id: TypeId) -> bool {
        if let Some(&open) = self.open_types.get(&type_id) {
            return open;
        }
        let graph = self.graph;
        let open = match graph.lookup(type_id) {
            None | Some(TypeData::Intrinsic(_) | TypeData::Literal(_)) => false,
            Some(TypeData::TypeParameter(_)) => true,
            Some(TypeData::Reference(app)) => {
                app.args.iter().any(|&a| self.contains_type_parameters(a))
            }
            Some(TypeData::Object(shape)) => graph.object_shape(*shape).is_some_and(|shape| {
                shape
                    .properties
                    .iter()
                    .map(|p| p.type_id)
                    .chain(shape.string_index)
                    .chain(shape.number_index)
                    .any(|t| self.contains_type_parameters(t))
            }),
            Some(TypeData::Array(element)) => self.contains_type_parameters(*element),
            Some(TypeData::Tuple(list)) => graph
                .tuple_list(*list)
                .iter()
                .any(|e| self.contains_type_parameters(e.type_id)),
            Some(TypeData::Union(list) | TypeData::Intersection(list)) => graph
                .type_list(*list)
                .iter()
                .any(|&m| self.contains_type_parameters(m)),
            Some(TypeData::KeyOf(operand)) => self.contains_type_parameters(*operand),
            Some(TypeData::IndexAccess(object, index)) => {
                self.contains_type_parameters(*object) || self.contains_type_parameters(*index)
            }
            Some(TypeData::TemplateLiteral(list)) => {
                graph.template_list(*list).iter().any(|span| match span {
                    TemplateSpan::Text(_) => false,
                    TemplateSpan::Type(t) => self.contains_type_parameters(*t),
                })
            }
        };
        self.open_types.insert(type_id, open);
        open
    }

    // -------------------------------------------------------------------------
    // Environment frames
    // -------------------------------------------------------------------------

    pub(crate) fn current_env(&self) -> EnvId {
        self.frames.last().copied().unwrap_or(EnvId::ROOT)
    }

    pub(crate) fn frames(&self) -> &[EnvId] {
        &self.frames
    }

    /// Run `f` with `env` as the innermost frame. The frame is popped on every
    /// exit path, including errors.
    pub(crate) fn with_frame<T>(&mut self, env: EnvId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.frames.push(env);
        trace!(env = env.0, depth = self.frames.len(), "push frame");
        let result = f(self);
        self.frames.pop();
        result
    }

    /// Enter a generic instantiation of `type_id` under `env`. Only
    /// environments that bind something count toward the depth limit.
    pub(crate) fn instantiate<T>(
        &mut self,
        type_id: TypeId,
        env: EnvId,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        if env == EnvId::ROOT {
            return self.with_frame(env, f);
        }
        if !self.instantiation_depth.enter() {
            return Err(CompileError::InstantiationTooDeep {
                type_name: self.format(type_id),
            });
        }
        let result = self.with_frame(env, f);
        self.instantiation_depth.leave();
        result
    }

    /// Follow a type that is looked through rather than compiled (alias
    /// bodies, parameter bindings) inside the set algebra and template
    /// flattening. Revisiting the same type in the same environment means the
    /// declarations resolve only to each other.
    pub(crate) fn follow<T>(
        &mut self,
        type_id: TypeId,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let key = (type_id, self.current_env());
        match self.alias_guard.enter(key) {
            RecursionResult::Entered => {
                let result = f(self);
                self.alias_guard.leave(key);
                result
            }
            RecursionResult::Cycle => Err(CompileError::CircularType {
                type_name: self.format(type_id),
            }),
            RecursionResult::DepthExceeded => Err(CompileError::InstantiationTooDeep {
                type_name: self.format(type_id),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Validator table
    // -------------------------------------------------------------------------

    pub(crate) fn key_for(&mut self, type_id: TypeId, mode: Mode, open: bool) -> ValidatorKey {
        let env = if self.contains_type_parameters(type_id) {
            self.current_env()
        } else {
            EnvId::ROOT
        };
        ValidatorKey {
            type_id,
            mode,
            env,
            open,
        }
    }

    /// Validator for `type_id` in `mode`, in the current environment.
    pub(crate) fn compile(&mut self, type_id: TypeId, mode: Mode) -> Result<ValidatorId> {
        self.compile_with(type_id, mode, false)
    }

    pub(crate) fn compile_with(
        &mut self,
        type_id: TypeId,
        mode: Mode,
        open: bool,
    ) -> Result<ValidatorId> {
        let key = self.key_for(type_id, mode, open);
        if let Some(&id) = self.memo.get(&key) {
            trace!(validator = %self.slots[id.0 as usize].name, "memo hit");
            return Ok(id);
        }

        let name = self.validator_name(type_id, &key.mode);
        let id = self.reserve(name);
        self.memo.insert(key.clone(), id);

        let body = match self.build(type_id, &key.mode, open) {
            Ok(body) => body,
            Err(err) => {
                trace!(validator = %self.slots[id.0 as usize].name, error = %err, "build failed");
                return Err(err);
            }
        };
        self.slots[id.0 as usize].body = Some(body);
        Ok(id)
    }

    fn reserve(&mut self, name: String) -> ValidatorId {
        let id = ValidatorId(self.slots.len() as u32);
        trace!(validator = %name, id = id.0, "reserve");
        self.slots.push(Slot { name, body: None });
        id
    }

    /// A validator outside the memo, with a fixed body.
    pub(crate) fn stub(&mut self, name: &str, body: Check) -> ValidatorId {
        let name = self.unique_name(format!("_{name}"));
        let id = self.reserve(name);
        self.slots[id.0 as usize].body = Some(body);
        id
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            slots: self.slots.len(),
        }
    }

    /// Drop every validator reserved since `checkpoint`.
    pub(crate) fn rollback(&mut self, checkpoint: Checkpoint) {
        let removed = self.slots.len() - checkpoint.slots;
        self.slots.truncate(checkpoint.slots);
        self.memo
            .retain(|_, id| (id.0 as usize) < checkpoint.slots);
        debug!(removed, "rolled back failed root compile");
    }

    pub(crate) fn validator_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn name_of(&self, id: ValidatorId) -> &str {
        &self.slots[id.0 as usize].name
    }

    pub(crate) fn body_of(&self, id: ValidatorId) -> Option<&Check> {
        self.slots.get(id.0 as usize).and_then(|slot| slot.body.as_ref())
    }

    pub(crate) fn into_program(self) -> Program {
        let functions = self
            .slots
            .into_iter()
            .map(|slot| {
                debug_assert!(slot.body.is_some(), "validator {} was never defined", slot.name);
                ValidatorFn {
                    name: slot.name,
                    body: slot.body.unwrap_or(Check::Accept),
                }
            })
            .collect();
        Program::from_functions(functions)
    }

    // -------------------------------------------------------------------------
    // Naming
    // -------------------------------------------------------------------------

    fn validator_name(&mut self, type_id: TypeId, mode: &Mode) -> String {
        let readable = sanitize(&self.format(type_id));
        let base = match mode {
            Mode::TypeCheck => format!("_{readable}"),
            Mode::KeyOf => format!("_keyof_{readable}"),
            Mode::IndexedAccess(_) => format!("_index_{readable}"),
        };
        self.unique_name(base)
    }

    fn unique_name(&mut self, base: String) -> String {
        let count = self.name_counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}_{count}")
        }
    }
}

const MAX_NAME_LEN: usize = 40;

/// Identifier-safe rendering of a formatted type: `string | null` becomes
/// `string_or_null`, `number[]` becomes `number_array`.
fn sanitize(formatted: &str) -> String {
    let spelled = formatted
        .replace("[]", " array")
        .replace('|', " or ")
        .replace('&', " and ");
    let mut out = String::with_capacity(spelled.len());
    for ch in spelled.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        if out.len() >= MAX_NAME_LEN {
            break;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("object");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn test_sanitize_readable_names() {
        assert_eq!(sanitize("number"), "number");
        assert_eq!(sanitize("string | null"), "string_or_null");
        assert_eq!(sanitize("number[]"), "number_array");
        assert_eq!(sanitize("{ a: number }"), "a_number");
        assert_eq!(sanitize("{}"), "object");
        assert_eq!(sanitize("Box<number>"), "Box_number");
    }
}
