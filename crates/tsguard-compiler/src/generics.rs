//! Type-argument environments.
//!
//! A generic declaration is compiled once per distinct set of resolved type
//! arguments. Arguments are recorded as [`Binding`]s: the argument type plus
//! the environment it must be read in, so `T` inside `Box<T>` inside
//! `Pair<number>` resolves through `Pair`'s environment rather than by
//! rewriting the type graph.
//!
//! Environments are interned, which makes "same resolved arguments" an
//! `EnvId` comparison and keeps memo keys small.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::trace;

use tsguard_types::{DefId, DefKind, DefinitionInfo, TypeApplication, TypeData, TypeId};

use crate::context::VisitorContext;
use crate::error::{CompileError, Result};

/// Handle to an interned environment. `EnvId::ROOT` binds nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId(pub u32);

impl EnvId {
    pub const ROOT: EnvId = EnvId(0);
}

/// A type argument together with the environment it is evaluated in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub type_id: TypeId,
    pub env: EnvId,
}

impl Binding {
    /// A binding for a type that mentions no type parameters.
    pub const fn closed(type_id: TypeId) -> Self {
        Self {
            type_id,
            env: EnvId::ROOT,
        }
    }
}

/// `(parameter, binding)` pairs, sorted by parameter.
pub(crate) type Bindings = SmallVec<[(TypeId, Binding); 4]>;

#[derive(Debug)]
pub(crate) struct EnvStore {
    envs: Vec<Bindings>,
    index: FxHashMap<Bindings, EnvId>,
}

impl EnvStore {
    pub(crate) fn new() -> Self {
        let mut store = Self {
            envs: Vec::new(),
            index: FxHashMap::default(),
        };
        let root = store.intern(Bindings::new());
        debug_assert_eq!(root, EnvId::ROOT);
        store
    }

    /// Intern `bindings`. When a parameter is bound twice the first binding wins.
    pub(crate) fn intern(&mut self, mut bindings: Bindings) -> EnvId {
        bindings.sort_by_key(|(param, _)| *param);
        bindings.dedup_by_key(|(param, _)| *param);
        if let Some(&id) = self.index.get(&bindings) {
            return id;
        }
        let id = EnvId(self.envs.len() as u32);
        self.envs.push(bindings.clone());
        self.index.insert(bindings, id);
        id
    }

    pub(crate) fn lookup(&self, env: EnvId, param: TypeId) -> Option<Binding> {
        let bindings = self.envs.get(env.0 as usize)?;
        bindings
            .binary_search_by_key(&param, |(p, _)| *p)
            .ok()
            .map(|i| bindings[i].1)
    }

    pub(crate) fn len(&self) -> usize {
        self.envs.len()
    }
}

impl<'g> VisitorContext<'g> {
    /// Environment for compiling the declaration behind `reference`: its own
    /// parameters bound to the reference's arguments (or their defaults), plus
    /// every parameter of every inherited declaration bound to the arguments
    /// its `extends` clause supplies.
    pub(crate) fn substitution_for(&mut self, reference: &TypeApplication) -> Result<EnvId> {
        let mut bindings = Bindings::new();
        let mut visited: FxHashSet<DefId> = FxHashSet::default();
        let caller = self.current_env();
        self.bind_declaration(reference.def, &reference.args, caller, &mut bindings, &mut visited)?;
        let env = self.envs.intern(bindings);
        trace!(def = reference.def.0, env = env.0, "substitution");
        Ok(env)
    }

    fn bind_declaration(
        &mut self,
        def: DefId,
        args: &[TypeId],
        arg_env: EnvId,
        out: &mut Bindings,
        visited: &mut FxHashSet<DefId>,
    ) -> Result<()> {
        if !visited.insert(def) {
            return Ok(());
        }
        let info = self.definition(def)?;

        for (i, &param) in info.type_params.iter().enumerate() {
            let binding = match args.get(i) {
                Some(&arg) => self.bind(arg, arg_env)?,
                None => self.default_binding(param, out)?,
            };
            out.push((param, binding));
        }

        let bases = self.inherited_references(&info)?;
        if bases.is_empty() {
            return Ok(());
        }
        let own_env = self.envs.intern(out.clone());
        for base in bases {
            self.bind_declaration(base.def, &base.args, own_env, out, visited)?;
        }
        Ok(())
    }

    /// Declarations whose members `info` inherits: its `extends` clauses, or
    /// for an alias the references its body intersects.
    fn inherited_references(&self, info: &DefinitionInfo) -> Result<Vec<TypeApplication>> {
        let roots: Vec<TypeId> = match (info.kind, info.body) {
            (DefKind::TypeAlias, Some(body)) => vec![body],
            _ => info.heritage.clone(),
        };
        let mut out = Vec::new();
        for root in roots {
            match self.lookup(root)? {
                TypeData::Reference(app) => out.push(app),
                TypeData::Intersection(list) => {
                    for &member in self.graph.type_list(list) {
                        if let TypeData::Reference(app) = self.lookup(member)? {
                            out.push(app);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(out)
    }

    /// A missing argument falls back to the parameter's default, read in the
    /// environment of the parameters bound so far.
    fn default_binding(&mut self, param: TypeId, bound: &Bindings) -> Result<Binding> {
        let info = self.type_param(param)?;
        match info.default {
            Some(default) => {
                let partial = self.envs.intern(bound.clone());
                self.bind(default, partial)
            }
            None => Err(CompileError::UnboundTypeParameter { name: info.name }),
        }
    }

    /// Bind `arg` as read in `env`. A bare parameter collapses to its own
    /// binding so chains like `L<T>` inside `L<T>` intern to the same
    /// environment; a closed type needs no environment at all.
    pub(crate) fn bind(&mut self, arg: TypeId, env: EnvId) -> Result<Binding> {
        if matches!(self.lookup(arg)?, TypeData::TypeParameter(_)) {
            return self.resolve_param_in(arg, env);
        }
        if !self.contains_type_parameters(arg) {
            return Ok(Binding::closed(arg));
        }
        Ok(Binding { type_id: arg, env })
    }

    /// Resolve `param` in the current environment.
    pub(crate) fn resolve_param(&mut self, param: TypeId) -> Result<Binding> {
        let env = self.current_env();
        self.resolve_param_in(param, env)
    }

    /// Look `param` up in `env`, then in the enclosing frames innermost first,
    /// then fall back to its default.
    fn resolve_param_in(&mut self, param: TypeId, env: EnvId) -> Result<Binding> {
        if let Some(binding) = self.envs.lookup(env, param) {
            return Ok(binding);
        }
        if let Some(binding) = self
            .frames()
            .iter()
            .rev()
            .find_map(|&frame| self.envs.lookup(frame, param))
        {
            return Ok(binding);
        }
        let info = self.type_param(param)?;
        match info.default {
            Some(default) if default != param => self.bind(default, env),
            _ => Err(CompileError::UnboundTypeParameter { name: info.name }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_interning_is_order_independent() {
        let mut store = EnvStore::new();
        let a = (TypeId(100), Binding::closed(TypeId::NUMBER));
        let b = (TypeId(101), Binding::closed(TypeId::STRING));
        let first = store.intern(SmallVec::from_vec(vec![a, b]));
        let second = store.intern(SmallVec::from_vec(vec![b, a]));
        assert_eq!(first, second);
        assert_ne!(first, EnvId::ROOT);
        assert_eq!(store.lookup(first, TypeId(101)), Some(b.1));
        assert_eq!(store.lookup(EnvId::ROOT, TypeId(101)), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_first_binding_wins() {
        let mut store = EnvStore::new();
        let env = store.intern(SmallVec::from_vec(vec![
            (TypeId(100), Binding::closed(TypeId::NUMBER)),
            (TypeId(100), Binding::closed(TypeId::STRING)),
        ]));
        assert_eq!(
            store.lookup(env, TypeId(100)),
            Some(Binding::closed(TypeId::NUMBER))
        );
    }
}
