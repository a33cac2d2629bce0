//! Literal-set algebra for `keyof` and indexed access.
//!
//! A [`LiteralSet`] is tri-state: `Always` is the whole domain (`string`),
//! `Never` is empty, and `Concrete` lists literal values. Key sets combine
//! componentwise over their string and number parts:
//!
//! | Operation | Always | Never | Concrete |
//! |-----------|--------|-------|----------|
//! | `∪ X` | Always | X | set union (with a Concrete X) |
//! | `∩ X` | X | Never | set intersection (with a Concrete X) |
//!
//! `keyof (A | B)` intersects the members' key sets; `keyof (A & B)` unions
//! them. Indexed access distributes over concrete keys and resolves to an
//! [`Access`] tree that lowers to conjunctions and disjunctions.

use std::collections::BTreeSet;

use tsguard_types::utils::{is_numeric_literal_name, js_number_to_string, quote_string};
use tsguard_types::{
    BuiltinClass, DefKind, IntrinsicKind, LiteralValue, OrderedFloat, PropertyInfo, TypeData,
    TypeId,
};

use crate::builders::Members;
use crate::combinators::{assert, call, conjunction, disjunction, literal};
use crate::context::{Mode, VisitorContext};
use crate::error::{CompileError, Result};
use crate::generics::Binding;
use crate::program::{Assertion, Check};
use crate::reason::Reason;

/// Tri-state set of literal values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralSet<T: Ord> {
    Always,
    Never,
    Concrete(BTreeSet<T>),
}

impl<T: Ord> LiteralSet<T> {
    pub fn single(value: T) -> Self {
        LiteralSet::Concrete(BTreeSet::from([value]))
    }

    pub fn union(self, other: Self) -> Self {
        match (self, other) {
            (LiteralSet::Always, _) | (_, LiteralSet::Always) => LiteralSet::Always,
            (LiteralSet::Never, x) | (x, LiteralSet::Never) => x,
            (LiteralSet::Concrete(mut a), LiteralSet::Concrete(b)) => {
                a.extend(b);
                LiteralSet::Concrete(a)
            }
        }
    }

    pub fn intersect(self, other: Self) -> Self {
        match (self, other) {
            (LiteralSet::Never, _) | (_, LiteralSet::Never) => LiteralSet::Never,
            (LiteralSet::Always, x) | (x, LiteralSet::Always) => x,
            (LiteralSet::Concrete(mut a), LiteralSet::Concrete(b)) => {
                a.retain(|value| b.contains(value));
                LiteralSet::Concrete(a)
            }
        }
    }

    /// Empty, either as `Never` or as an empty concrete set.
    pub fn is_empty(&self) -> bool {
        match self {
            LiteralSet::Never => true,
            LiteralSet::Concrete(values) => values.is_empty(),
            LiteralSet::Always => false,
        }
    }
}

impl<T: Ord> FromIterator<T> for LiteralSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        LiteralSet::Concrete(iter.into_iter().collect())
    }
}

/// The keys of a type, or the values of an index type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeySet {
    pub strings: LiteralSet<String>,
    pub numbers: LiteralSet<OrderedFloat>,
}

impl KeySet {
    pub fn never() -> Self {
        Self {
            strings: LiteralSet::Never,
            numbers: LiteralSet::Never,
        }
    }

    pub fn always() -> Self {
        Self {
            strings: LiteralSet::Always,
            numbers: LiteralSet::Always,
        }
    }

    pub fn strings(strings: LiteralSet<String>) -> Self {
        Self {
            strings,
            numbers: LiteralSet::Never,
        }
    }

    pub fn numbers(numbers: LiteralSet<OrderedFloat>) -> Self {
        Self {
            strings: LiteralSet::Never,
            numbers,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            strings: self.strings.union(other.strings),
            numbers: self.numbers.union(other.numbers),
        }
    }

    pub fn intersect(self, other: Self) -> Self {
        Self {
            strings: self.strings.intersect(other.strings),
            numbers: self.numbers.intersect(other.numbers),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty() && self.numbers.is_empty()
    }

    /// The individual keys to distribute an indexed access over.
    fn keys(&self) -> Vec<IndexKey> {
        let mut keys = Vec::new();
        match &self.strings {
            LiteralSet::Always => keys.push(IndexKey::AnyString),
            LiteralSet::Never => {}
            LiteralSet::Concrete(values) => {
                keys.extend(values.iter().cloned().map(IndexKey::String));
            }
        }
        match &self.numbers {
            LiteralSet::Always => keys.push(IndexKey::AnyNumber),
            LiteralSet::Never => {}
            LiteralSet::Concrete(values) => keys.extend(values.iter().map(|n| IndexKey::Number(n.0))),
        }
        keys
    }
}

#[derive(Clone, Debug, PartialEq)]
enum IndexKey {
    String(String),
    Number(f64),
    AnyString,
    AnyNumber,
}

impl IndexKey {
    fn describe(&self) -> String {
        match self {
            IndexKey::String(s) => quote_string(s),
            IndexKey::Number(n) => js_number_to_string(*n),
            IndexKey::AnyString => "string".to_string(),
            IndexKey::AnyNumber => "number".to_string(),
        }
    }
}

/// The types an indexed access resolves to.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Access {
    Member(Binding),
    /// The value may be any of these (distribution over keys or union members).
    AnyOf(Vec<Access>),
    /// The value must be all of these (intersection members).
    AllOf(Vec<Access>),
}

impl<'g> VisitorContext<'g> {
    // -------------------------------------------------------------------------
    // keyof
    // -------------------------------------------------------------------------

    pub(crate) fn keys_of(&mut self, type_id: TypeId) -> Result<KeySet> {
        match self.lookup(type_id)? {
            TypeData::Intrinsic(IntrinsicKind::Any | IntrinsicKind::Never) => Ok(KeySet::always()),
            TypeData::Intrinsic(_)
            | TypeData::Literal(_)
            | TypeData::KeyOf(_)
            | TypeData::TemplateLiteral(_) => Ok(KeySet::never()),
            TypeData::Object(shape) => {
                Ok(self
                    .graph
                    .object_shape(shape)
                    .map_or_else(KeySet::never, |s| member_keys(&Members::from_shape(s))))
            }
            TypeData::Array(_) => Ok(KeySet::numbers(LiteralSet::Always)),
            TypeData::Tuple(list) => {
                let len = self.graph.tuple_list(list).len();
                Ok(KeySet::numbers(
                    (0..len).map(|i| OrderedFloat::from(i as f64)).collect(),
                ))
            }
            TypeData::Union(list) => {
                let mut keys = KeySet::always();
                for member in self.graph.type_list(list).to_vec() {
                    keys = keys.intersect(self.keys_of(member)?);
                }
                Ok(keys)
            }
            TypeData::Intersection(list) => {
                let mut keys = KeySet::never();
                for member in self.graph.type_list(list).to_vec() {
                    keys = keys.union(self.keys_of(member)?);
                }
                Ok(keys)
            }
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(type_id)?;
                self.follow(type_id, |cx| {
                    cx.with_frame(binding.env, |cx| cx.keys_of(binding.type_id))
                })
            }
            TypeData::Reference(app) => {
                let def = self.definition(app.def)?;
                match def.kind {
                    DefKind::Class if def.builtin == Some(BuiltinClass::Date) => {
                        Ok(KeySet::never())
                    }
                    DefKind::Class | DefKind::Interface => {
                        Ok(member_keys(&self.members_of_declaration(app.def)?))
                    }
                    DefKind::TypeAlias => {
                        let Some(body) = def.body else {
                            return Err(self.unsupported(type_id, "type alias has no definition"));
                        };
                        let env = self.substitution_for(&app)?;
                        self.follow(type_id, |cx| cx.with_frame(env, |cx| cx.keys_of(body)))
                    }
                }
            }
            TypeData::IndexAccess(object, index) => {
                let keys = self.index_key_set(index)?;
                let access = self.access(object, &keys)?;
                self.keys_of_access(&access)
            }
        }
    }

    fn keys_of_access(&mut self, access: &Access) -> Result<KeySet> {
        match access {
            Access::Member(binding) => {
                let binding = *binding;
                self.with_frame(binding.env, |cx| cx.keys_of(binding.type_id))
            }
            Access::AnyOf(members) => {
                let mut keys = KeySet::always();
                for member in members {
                    keys = keys.intersect(self.keys_of_access(member)?);
                }
                Ok(keys)
            }
            Access::AllOf(members) => {
                let mut keys = KeySet::never();
                for member in members {
                    keys = keys.union(self.keys_of_access(member)?);
                }
                Ok(keys)
            }
        }
    }

    /// Validator body accepting exactly the keys of `type_id`.
    pub(crate) fn build_keyof(&mut self, type_id: TypeId) -> Result<Check> {
        let keys = self.keys_of(type_id)?;
        let mut alternatives = Vec::new();
        match keys.strings {
            LiteralSet::Always => alternatives.push(assert(Assertion::String, Reason::String)),
            LiteralSet::Never => {}
            LiteralSet::Concrete(values) => {
                alternatives.extend(values.into_iter().map(|s| literal(LiteralValue::String(s))));
            }
        }
        match keys.numbers {
            LiteralSet::Always => alternatives.push(assert(Assertion::Number, Reason::Number)),
            LiteralSet::Never => {}
            LiteralSet::Concrete(values) => {
                alternatives.extend(values.into_iter().map(|n| literal(LiteralValue::Number(n))));
            }
        }
        Ok(disjunction(alternatives))
    }

    // -------------------------------------------------------------------------
    // Index types
    // -------------------------------------------------------------------------

    /// The literal values an index type stands for.
    pub(crate) fn index_key_set(&mut self, index: TypeId) -> Result<KeySet> {
        match self.lookup(index)? {
            TypeData::Intrinsic(IntrinsicKind::String) => Ok(KeySet::strings(LiteralSet::Always)),
            TypeData::Intrinsic(IntrinsicKind::Number) => Ok(KeySet::numbers(LiteralSet::Always)),
            TypeData::Intrinsic(IntrinsicKind::Any) => Ok(KeySet::always()),
            TypeData::Intrinsic(_) | TypeData::Literal(LiteralValue::Boolean(_)) => {
                Ok(KeySet::never())
            }
            TypeData::Literal(LiteralValue::String(s)) => {
                Ok(KeySet::strings(LiteralSet::single(s)))
            }
            TypeData::Literal(LiteralValue::Number(n)) => {
                Ok(KeySet::numbers(LiteralSet::single(n)))
            }
            TypeData::TemplateLiteral(_) => Ok(KeySet::strings(LiteralSet::Always)),
            TypeData::Union(list) => {
                let mut keys = KeySet::never();
                for member in self.graph.type_list(list).to_vec() {
                    keys = keys.union(self.index_key_set(member)?);
                }
                Ok(keys)
            }
            TypeData::Intersection(list) => {
                let mut keys = KeySet::always();
                for member in self.graph.type_list(list).to_vec() {
                    keys = keys.intersect(self.index_key_set(member)?);
                }
                Ok(keys)
            }
            TypeData::KeyOf(operand) => self.keys_of(operand),
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(index)?;
                self.follow(index, |cx| {
                    cx.with_frame(binding.env, |cx| cx.index_key_set(binding.type_id))
                })
            }
            TypeData::Reference(app) => {
                let def = self.definition(app.def)?;
                match (def.kind, def.body) {
                    (DefKind::TypeAlias, Some(body)) => {
                        let env = self.substitution_for(&app)?;
                        self.follow(index, |cx| {
                            cx.with_frame(env, |cx| cx.index_key_set(body))
                        })
                    }
                    _ => Ok(KeySet::never()),
                }
            }
            TypeData::IndexAccess(object, inner) => {
                let keys = self.index_key_set(inner)?;
                let access = self.access(object, &keys)?;
                self.index_key_set_of_access(&access)
            }
            TypeData::Object(_) | TypeData::Array(_) | TypeData::Tuple(_) => Ok(KeySet::never()),
        }
    }

    fn index_key_set_of_access(&mut self, access: &Access) -> Result<KeySet> {
        match access {
            Access::Member(binding) => {
                let binding = *binding;
                self.with_frame(binding.env, |cx| cx.index_key_set(binding.type_id))
            }
            Access::AnyOf(members) => {
                let mut keys = KeySet::never();
                for member in members {
                    keys = keys.union(self.index_key_set_of_access(member)?);
                }
                Ok(keys)
            }
            Access::AllOf(members) => {
                let mut keys = KeySet::always();
                for member in members {
                    keys = keys.intersect(self.index_key_set_of_access(member)?);
                }
                Ok(keys)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Indexed access
    // -------------------------------------------------------------------------

    pub(crate) fn build_indexed_access(&mut self, object: TypeId, index: &KeySet) -> Result<Check> {
        let access = self.access(object, index)?;
        self.lower_access(&access)
    }

    fn lower_access(&mut self, access: &Access) -> Result<Check> {
        match access {
            Access::Member(binding) => {
                let binding = *binding;
                let id = self.with_frame(binding.env, |cx| {
                    cx.compile(binding.type_id, Mode::TypeCheck)
                })?;
                Ok(call(id))
            }
            Access::AnyOf(members) => {
                let mut checks = Vec::with_capacity(members.len());
                for member in members {
                    checks.push(self.lower_access(member)?);
                }
                Ok(disjunction(checks))
            }
            Access::AllOf(members) => {
                let mut checks = Vec::with_capacity(members.len());
                for member in members {
                    checks.push(self.lower_access(member)?);
                }
                Ok(conjunction(checks))
            }
        }
    }

    /// `object[index]`, distributed over the individual keys of `index`.
    pub(crate) fn access(&mut self, object: TypeId, index: &KeySet) -> Result<Access> {
        let mut keys = index.keys();
        if keys.len() == 1 {
            let key = keys.remove(0);
            return self.access_key(object, &key);
        }
        let mut alternatives = Vec::with_capacity(keys.len());
        for key in &keys {
            alternatives.push(self.access_key(object, key)?);
        }
        Ok(Access::AnyOf(alternatives))
    }

    fn access_key(&mut self, object: TypeId, key: &IndexKey) -> Result<Access> {
        match self.lookup(object)? {
            TypeData::Intrinsic(IntrinsicKind::Any) => Ok(Access::Member(Binding::closed(TypeId::ANY))),
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(object)?;
                self.follow(object, |cx| {
                    cx.with_frame(binding.env, |cx| cx.access_key(binding.type_id, key))
                })
            }
            TypeData::Reference(app) => {
                let def = self.definition(app.def)?;
                match def.kind {
                    DefKind::TypeAlias => {
                        let Some(body) = def.body else {
                            return Err(self.unsupported(object, "type alias has no definition"));
                        };
                        let env = self.substitution_for(&app)?;
                        self.follow(object, |cx| cx.with_frame(env, |cx| cx.access_key(body, key)))
                    }
                    DefKind::Class if def.builtin.is_some() => Err(self.missing_index(object, key)),
                    DefKind::Class | DefKind::Interface => {
                        let env = self.substitution_for(&app)?;
                        self.with_frame(env, |cx| {
                            let members = cx.members_of_declaration(app.def)?;
                            cx.access_member(object, &members, key)
                        })
                    }
                }
            }
            TypeData::Object(shape) => {
                let members = self
                    .graph
                    .object_shape(shape)
                    .map(Members::from_shape)
                    .unwrap_or_default();
                self.access_member(object, &members, key)
            }
            TypeData::Array(element) => match key {
                IndexKey::Number(_) | IndexKey::AnyNumber => self.member(element),
                IndexKey::String(name) if name == "length" => self.member(TypeId::NUMBER),
                IndexKey::String(name) if is_numeric_literal_name(name) => self.member(element),
                _ => Err(self.missing_index(object, key)),
            },
            TypeData::Tuple(list) => {
                let elements = self.graph.tuple_list(list).to_vec();
                let position = match key {
                    IndexKey::AnyNumber => {
                        let mut alternatives = Vec::with_capacity(elements.len());
                        for element in &elements {
                            alternatives.push(self.member(element.type_id)?);
                        }
                        return Ok(Access::AnyOf(alternatives));
                    }
                    IndexKey::String(name) if name == "length" => {
                        return self.member(TypeId::NUMBER);
                    }
                    IndexKey::Number(n) => Some(*n),
                    IndexKey::String(name) => name.parse::<f64>().ok().filter(|_| is_numeric_literal_name(name)),
                    IndexKey::AnyString => None,
                };
                let element = position
                    .filter(|n| n.fract() == 0.0 && *n >= 0.0)
                    .and_then(|n| elements.get(n as usize));
                match element {
                    Some(element) => self.optional_member(element.type_id, element.optional),
                    None => Err(self.missing_index(object, key)),
                }
            }
            TypeData::Union(list) => {
                let mut alternatives = Vec::new();
                for member in self.graph.type_list(list).to_vec() {
                    alternatives.push(self.access_key(member, key)?);
                }
                Ok(Access::AnyOf(alternatives))
            }
            TypeData::Intersection(list) => {
                let mut required = Vec::new();
                for member in self.graph.type_list(list).to_vec() {
                    match self.access_key(member, key) {
                        Ok(access) => required.push(access),
                        Err(CompileError::IndexDoesNotExist { .. }) => {}
                        Err(err) => return Err(err),
                    }
                }
                if required.is_empty() {
                    return Err(self.missing_index(object, key));
                }
                Ok(Access::AllOf(required))
            }
            TypeData::IndexAccess(inner_object, inner_index) => {
                let inner_keys = self.index_key_set(inner_index)?;
                let inner = self.access(inner_object, &inner_keys)?;
                self.access_through(&inner, key)
            }
            TypeData::Intrinsic(_)
            | TypeData::Literal(_)
            | TypeData::KeyOf(_)
            | TypeData::TemplateLiteral(_) => Err(self.missing_index(object, key)),
        }
    }

    fn access_through(&mut self, inner: &Access, key: &IndexKey) -> Result<Access> {
        match inner {
            Access::Member(binding) => {
                let binding = *binding;
                self.with_frame(binding.env, |cx| cx.access_key(binding.type_id, key))
            }
            Access::AnyOf(members) => {
                let mut out = Vec::with_capacity(members.len());
                for member in members {
                    out.push(self.access_through(member, key)?);
                }
                Ok(Access::AnyOf(out))
            }
            Access::AllOf(members) => {
                let mut out = Vec::with_capacity(members.len());
                for member in members {
                    out.push(self.access_through(member, key)?);
                }
                Ok(Access::AllOf(out))
            }
        }
    }

    fn access_member(&mut self, object: TypeId, members: &Members, key: &IndexKey) -> Result<Access> {
        match key {
            IndexKey::String(name) => {
                if let Some(property) = members.property(name) {
                    return self.property_member(property);
                }
                if let Some(index) = members.string_index {
                    return self.member(index);
                }
                match members.number_index {
                    Some(index) if is_numeric_literal_name(name) => self.member(index),
                    _ => Err(self.missing_index(object, key)),
                }
            }
            IndexKey::Number(n) => {
                let name = js_number_to_string(*n);
                if let Some(property) = members.property(&name) {
                    return self.property_member(property);
                }
                match members.number_index.or(members.string_index) {
                    Some(index) => self.member(index),
                    None => Err(self.missing_index(object, key)),
                }
            }
            IndexKey::AnyNumber if members.has_index_signature() => {
                let index = members.number_index.or(members.string_index);
                match index {
                    Some(index) => self.member(index),
                    None => Err(self.missing_index(object, key)),
                }
            }
            IndexKey::AnyString | IndexKey::AnyNumber => {
                let mut alternatives = Vec::new();
                for property in &members.properties {
                    alternatives.push(self.property_member(property)?);
                }
                for index in [members.string_index, members.number_index].into_iter().flatten() {
                    alternatives.push(self.member(index)?);
                }
                if alternatives.is_empty() {
                    return Err(self.missing_index(object, key));
                }
                Ok(Access::AnyOf(alternatives))
            }
        }
    }

    fn member(&mut self, type_id: TypeId) -> Result<Access> {
        let env = self.current_env();
        Ok(Access::Member(self.bind(type_id, env)?))
    }

    fn property_member(&mut self, property: &PropertyInfo) -> Result<Access> {
        self.optional_member(property.type_id, property.optional)
    }

    /// An optional position reads as `T | undefined`.
    fn optional_member(&mut self, type_id: TypeId, optional: bool) -> Result<Access> {
        let member = self.member(type_id)?;
        if optional {
            Ok(Access::AnyOf(vec![
                member,
                Access::Member(Binding::closed(TypeId::UNDEFINED)),
            ]))
        } else {
            Ok(member)
        }
    }

    fn missing_index(&self, object: TypeId, key: &IndexKey) -> CompileError {
        CompileError::IndexDoesNotExist {
            type_name: self.format(object),
            index: key.describe(),
        }
    }

    // -------------------------------------------------------------------------
    // Declared names (exact-mode intersections)
    // -------------------------------------------------------------------------

    /// Property names an intersection member declares. `Always` means the
    /// member admits any key, which includes any index signature, the same
    /// rule a standalone exact object uses. `Never` means it is not object-like.
    pub(crate) fn declared_names(&mut self, type_id: TypeId) -> Result<LiteralSet<String>> {
        match self.lookup(type_id)? {
            TypeData::Intrinsic(IntrinsicKind::Any | IntrinsicKind::Unknown) => Ok(LiteralSet::Always),
            TypeData::Intrinsic(_)
            | TypeData::Literal(_)
            | TypeData::Array(_)
            | TypeData::Tuple(_)
            | TypeData::KeyOf(_)
            | TypeData::TemplateLiteral(_) => Ok(LiteralSet::Never),
            TypeData::IndexAccess(..) => Ok(LiteralSet::Always),
            TypeData::Object(shape) => Ok(match self.graph.object_shape(shape) {
                Some(shape) if shape.string_index.is_some() || shape.number_index.is_some() => {
                    LiteralSet::Always
                }
                Some(shape) => shape.properties.iter().map(|p| p.name.clone()).collect(),
                None => LiteralSet::Concrete(BTreeSet::new()),
            }),
            TypeData::Union(list) | TypeData::Intersection(list) => {
                let mut names = LiteralSet::Never;
                for member in self.graph.type_list(list).to_vec() {
                    names = names.union(self.declared_names(member)?);
                }
                Ok(names)
            }
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(type_id)?;
                self.follow(type_id, |cx| {
                    cx.with_frame(binding.env, |cx| cx.declared_names(binding.type_id))
                })
            }
            TypeData::Reference(app) => {
                let def = self.definition(app.def)?;
                match def.kind {
                    DefKind::Class if def.builtin.is_some() => Ok(LiteralSet::Never),
                    DefKind::Class if self.options.ignore_classes => Ok(LiteralSet::Always),
                    DefKind::Class | DefKind::Interface => {
                        let members = self.members_of_declaration(app.def)?;
                        if members.has_index_signature() {
                            Ok(LiteralSet::Always)
                        } else {
                            Ok(members.names().map(str::to_string).collect())
                        }
                    }
                    DefKind::TypeAlias => {
                        let Some(body) = def.body else {
                            return Err(self.unsupported(type_id, "type alias has no definition"));
                        };
                        let env = self.substitution_for(&app)?;
                        self.follow(type_id, |cx| cx.with_frame(env, |cx| cx.declared_names(body)))
                    }
                }
            }
        }
    }
}

/// Keys of an object-like member set. A string index admits every key,
/// including numeric ones.
fn member_keys(members: &Members) -> KeySet {
    if members.string_index.is_some() {
        return KeySet::always();
    }
    KeySet {
        strings: members.names().map(str::to_string).collect(),
        numbers: if members.number_index.is_some() {
            LiteralSet::Always
        } else {
            LiteralSet::Never
        },
    }
}

#[cfg(test)]
#[path = "../tests/set_algebra_tests.rs"]
mod tests;
