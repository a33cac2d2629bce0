//! The type graph: an interning arena for `TypeData` plus the declaration table.
//!
//! Construction goes exclusively through the builder methods here (`union`,
//! `object`, `reference`, ...). The compiler only ever holds a `&TypeGraph`, so
//! nothing downstream can mutate the graph while validators are being built.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::def::{BuiltinClass, DefId, DefKind, DefinitionInfo};
use crate::types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, OrderedFloat, ParamId, PropertyInfo,
    TemplateLiteralId, TemplateSpan, TupleElement, TupleListId, TypeApplication, TypeData, TypeId,
    TypeListId, TypeParamInfo,
};

/// Dedupes values of one kind and hands out dense indices.
#[derive(Debug)]
struct ListStore<T: Hash + Eq + Clone> {
    items: Vec<T>,
    index: FxHashMap<T, u32>,
}

impl<T: Hash + Eq + Clone> ListStore<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    fn intern(&mut self, item: T) -> u32 {
        if let Some(&id) = self.index.get(&item) {
            return id;
        }
        let id = self.items.len() as u32;
        self.items.push(item.clone());
        self.index.insert(item, id);
        id
    }

    fn get(&self, id: u32) -> Option<&T> {
        self.items.get(id as usize)
    }
}

/// Interned structural type graph.
#[derive(Debug)]
pub struct TypeGraph {
    types: ListStore<TypeData>,
    type_lists: ListStore<Vec<TypeId>>,
    shapes: ListStore<ObjectShape>,
    tuples: ListStore<Vec<TupleElement>>,
    templates: ListStore<Vec<TemplateSpan>>,
    definitions: Vec<DefinitionInfo>,
    def_names: FxHashMap<String, DefId>,
    next_param: u32,
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            types: ListStore::new(),
            type_lists: ListStore::new(),
            shapes: ListStore::new(),
            tuples: ListStore::new(),
            templates: ListStore::new(),
            definitions: Vec::new(),
            def_names: FxHashMap::default(),
            next_param: 0,
        };

        // Order must match the `TypeId` constants.
        for kind in [
            IntrinsicKind::Any,
            IntrinsicKind::Unknown,
            IntrinsicKind::Never,
            IntrinsicKind::Null,
            IntrinsicKind::Undefined,
            IntrinsicKind::Boolean,
            IntrinsicKind::Number,
            IntrinsicKind::Bigint,
            IntrinsicKind::String,
            IntrinsicKind::Object,
            IntrinsicKind::Function,
        ] {
            graph.intern(TypeData::Intrinsic(kind));
        }
        graph.intern(TypeData::Literal(LiteralValue::Boolean(true)));
        graph.intern(TypeData::Literal(LiteralValue::Boolean(false)));

        let date = graph.declare(DefKind::Class, "Date");
        debug_assert_eq!(date, DefId::DATE);
        graph.definitions[date.0 as usize].builtin = Some(BuiltinClass::Date);
        let date_instance = graph.reference(date, Vec::new());
        debug_assert_eq!(date_instance, TypeId::DATE);

        graph
    }

    fn intern(&mut self, data: TypeData) -> TypeId {
        TypeId(self.types.intern(data))
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    pub fn lookup(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0)
    }

    pub fn type_list(&self, id: TypeListId) -> &[TypeId] {
        self.type_lists.get(id.0).map_or(&[], Vec::as_slice)
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Option<&ObjectShape> {
        self.shapes.get(id.0)
    }

    pub fn tuple_list(&self, id: TupleListId) -> &[TupleElement] {
        self.tuples.get(id.0).map_or(&[], Vec::as_slice)
    }

    pub fn template_list(&self, id: TemplateLiteralId) -> &[TemplateSpan] {
        self.templates.get(id.0).map_or(&[], Vec::as_slice)
    }

    pub fn definition(&self, def: DefId) -> Option<&DefinitionInfo> {
        self.definitions.get(def.0 as usize)
    }

    pub fn def_by_name(&self, name: &str) -> Option<DefId> {
        self.def_names.get(name).copied()
    }

    pub fn type_param_info(&self, id: TypeId) -> Option<&TypeParamInfo> {
        match self.lookup(id) {
            Some(TypeData::TypeParameter(info)) => Some(info),
            _ => None,
        }
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.types.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.items.is_empty()
    }

    // -------------------------------------------------------------------------
    // Builders
    // -------------------------------------------------------------------------

    pub fn intrinsic(&mut self, kind: IntrinsicKind) -> TypeId {
        self.intern(TypeData::Intrinsic(kind))
    }

    pub fn literal_string(&mut self, value: &str) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::String(value.to_string())))
    }

    pub fn literal_number(&mut self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat::from(
            value,
        ))))
    }

    pub fn literal_boolean(&mut self, value: bool) -> TypeId {
        if value {
            TypeId::BOOLEAN_TRUE
        } else {
            TypeId::BOOLEAN_FALSE
        }
    }

    /// Union in declaration order. Nested unions are flattened and exact
    /// duplicates dropped; nothing else is normalized.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let members = self.flatten(members, |data| match data {
            TypeData::Union(list) => Some(*list),
            _ => None,
        });
        match members.len() {
            0 => TypeId::NEVER,
            1 => members[0],
            _ => {
                let list = TypeListId(self.type_lists.intern(members));
                self.intern(TypeData::Union(list))
            }
        }
    }

    /// Intersection in declaration order, flattened like [`union`](Self::union).
    pub fn intersection(&mut self, members: Vec<TypeId>) -> TypeId {
        let members = self.flatten(members, |data| match data {
            TypeData::Intersection(list) => Some(*list),
            _ => None,
        });
        match members.len() {
            0 => TypeId::UNKNOWN,
            1 => members[0],
            _ => {
                let list = TypeListId(self.type_lists.intern(members));
                self.intern(TypeData::Intersection(list))
            }
        }
    }

    fn flatten(
        &self,
        members: Vec<TypeId>,
        nested: impl Fn(&TypeData) -> Option<TypeListId>,
    ) -> Vec<TypeId> {
        let mut out: Vec<TypeId> = Vec::with_capacity(members.len());
        for member in members {
            let inner = self.lookup(member).and_then(&nested);
            match inner {
                Some(list) => {
                    for &m in self.type_list(list) {
                        if !out.contains(&m) {
                            out.push(m);
                        }
                    }
                }
                None => {
                    if !out.contains(&member) {
                        out.push(member);
                    }
                }
            }
        }
        out
    }

    pub fn object(&mut self, properties: Vec<PropertyInfo>) -> TypeId {
        self.object_with_index(ObjectShape::new(properties))
    }

    pub fn object_with_index(&mut self, shape: ObjectShape) -> TypeId {
        let id = ObjectShapeId(self.shapes.intern(shape));
        self.intern(TypeData::Object(id))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn tuple(&mut self, elements: Vec<TupleElement>) -> TypeId {
        let id = TupleListId(self.tuples.intern(elements));
        self.intern(TypeData::Tuple(id))
    }

    pub fn keyof(&mut self, operand: TypeId) -> TypeId {
        self.intern(TypeData::KeyOf(operand))
    }

    pub fn index_access(&mut self, object: TypeId, index: TypeId) -> TypeId {
        self.intern(TypeData::IndexAccess(object, index))
    }

    /// Template literal type. Adjacent text spans are merged and empty text dropped.
    pub fn template_literal(&mut self, spans: Vec<TemplateSpan>) -> TypeId {
        let mut merged: Vec<TemplateSpan> = Vec::with_capacity(spans.len());
        for span in spans {
            match span {
                TemplateSpan::Text(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    if let Some(TemplateSpan::Text(prev)) = merged.last_mut() {
                        prev.push_str(&text);
                    } else {
                        merged.push(TemplateSpan::Text(text));
                    }
                }
                span => merged.push(span),
            }
        }
        if merged.is_empty() {
            return self.literal_string("");
        }
        if let [TemplateSpan::Text(text)] = merged.as_slice() {
            let text = text.clone();
            return self.literal_string(&text);
        }
        let id = TemplateLiteralId(self.templates.intern(merged));
        self.intern(TypeData::TemplateLiteral(id))
    }

    /// Declare a fresh type parameter. Never deduplicated against other parameters.
    pub fn type_param(&mut self, name: impl Into<String>, default: Option<TypeId>) -> TypeId {
        let id = ParamId(self.next_param);
        self.next_param += 1;
        self.intern(TypeData::TypeParameter(TypeParamInfo {
            id,
            name: name.into(),
            default,
        }))
    }

    pub fn reference(&mut self, def: DefId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Reference(TypeApplication { def, args }))
    }

    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------

    /// Reserve a declaration so it can be referenced before its body exists.
    pub fn declare(&mut self, kind: DefKind, name: impl Into<String>) -> DefId {
        let name = name.into();
        let def = DefId(self.definitions.len() as u32);
        self.def_names.insert(name.clone(), def);
        self.definitions.push(DefinitionInfo::new(kind, name));
        def
    }

    pub fn set_type_params(&mut self, def: DefId, params: Vec<TypeId>) {
        if let Some(info) = self.definitions.get_mut(def.0 as usize) {
            info.type_params = params;
        }
    }

    pub fn set_body(&mut self, def: DefId, body: TypeId) {
        if let Some(info) = self.definitions.get_mut(def.0 as usize) {
            info.body = Some(body);
        }
    }

    pub fn add_heritage(&mut self, def: DefId, base: TypeId) {
        if let Some(info) = self.definitions.get_mut(def.0 as usize) {
            info.heritage.push(base);
        }
    }

    /// Declare and define a non-generic type alias in one step.
    pub fn alias(&mut self, name: impl Into<String>, body: TypeId) -> TypeId {
        let def = self.declare(DefKind::TypeAlias, name);
        self.set_body(def, body);
        self.reference(def, Vec::new())
    }

    /// Declare and define a non-generic interface in one step.
    pub fn interface(&mut self, name: impl Into<String>, properties: Vec<PropertyInfo>) -> TypeId {
        let def = self.declare(DefKind::Interface, name);
        let body = self.object(properties);
        self.set_body(def, body);
        self.reference(def, Vec::new())
    }
}
