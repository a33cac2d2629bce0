//! Type representation for the structural type graph.
//!
//! Types are interned: every distinct `TypeData` is stored once and referred to
//! by a `TypeId`. Equality of `TypeId`s is structural identity, which is what the
//! validator compiler uses as the first component of its memo keys.
//!
//! Type parameters are the exception to structural dedupe: every declared
//! parameter carries a fresh [`ParamId`], so two `T`s declared by different
//! generics never collapse into one node.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::def::DefId;

// =============================================================================
// TypeId
// =============================================================================

/// Handle to an interned type in a [`TypeGraph`](crate::TypeGraph).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

impl TypeId {
    // Intrinsics are interned first, in this order, by `TypeGraph::new`.
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const NULL: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const BOOLEAN: TypeId = TypeId(5);
    pub const NUMBER: TypeId = TypeId(6);
    pub const BIGINT: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const OBJECT: TypeId = TypeId(9);
    pub const FUNCTION: TypeId = TypeId(10);
    pub const BOOLEAN_TRUE: TypeId = TypeId(11);
    pub const BOOLEAN_FALSE: TypeId = TypeId(12);
    /// Instance type of the host `Date` class.
    pub const DATE: TypeId = TypeId(13);

    /// First id handed out for user-constructed types.
    pub const FIRST_USER: u32 = 14;

    /// Returns true for the fixed, pre-interned ids.
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

// =============================================================================
// Interned list handles
// =============================================================================

/// Handle to an interned list of member types (union / intersection members).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Handle to an interned object shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

/// Handle to an interned list of tuple elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleListId(pub u32);

/// Handle to an interned list of template literal spans.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TemplateLiteralId(pub u32);

/// Identity of a declared type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

// =============================================================================
// TypeData
// =============================================================================

/// The closed set of type categories the compiler understands.
///
/// Adding a variant here is a breaking change for every exhaustive match in the
/// compiler, which is the point: a new category cannot silently fall through.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// `any`, `unknown`, `never`, primitives, and the `object` / `Function` markers.
    Intrinsic(IntrinsicKind),

    /// `true`, `"foo"`, `42`
    Literal(LiteralValue),

    /// A declared type parameter: `T` in `interface Box<T>`.
    TypeParameter(TypeParamInfo),

    /// A reference to a named declaration, possibly instantiated: `Box<number>`.
    Reference(TypeApplication),

    /// An anonymous object shape: `{ a: number; [key: string]: unknown }`.
    Object(ObjectShapeId),

    /// `T[]`
    Array(TypeId),

    /// `[number, string?]`
    Tuple(TupleListId),

    /// `A | B`
    Union(TypeListId),

    /// `A & B`
    Intersection(TypeListId),

    /// `keyof T`
    KeyOf(TypeId),

    /// `T[K]`
    IndexAccess(TypeId, TypeId),

    /// `` `foo${string}` ``
    TemplateLiteral(TemplateLiteralId),
}

/// Intrinsic (built-in, non-structural) types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Boolean,
    Number,
    Bigint,
    String,
    /// The non-primitive `object` type.
    Object,
    /// Any callable value.
    Function,
}

impl IntrinsicKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Bigint => "bigint",
            Self::String => "string",
            Self::Object => "object",
            Self::Function => "Function",
        }
    }
}

/// Literal type payloads.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(OrderedFloat),
    String(String),
}

/// `f64` wrapper with total ordering so number literals can be hashed and sorted.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for OrderedFloat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedFloat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for OrderedFloat {
    fn from(value: f64) -> Self {
        // -0 and 0 are the same key
        if value == 0.0 { Self(0.0) } else { Self(value) }
    }
}

/// A declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub id: ParamId,
    pub name: String,
    pub default: Option<TypeId>,
}

/// A generic instantiation (or plain reference) of a declaration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeApplication {
    pub def: DefId,
    pub args: Vec<TypeId>,
}

/// A named property of an object shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: String,
    pub type_id: TypeId,
    pub optional: bool,
    /// Declared with method syntax: `foo(): void`.
    pub is_method: bool,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
            optional: false,
            is_method: false,
        }
    }

    pub fn opt(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            optional: true,
            ..Self::new(name, type_id)
        }
    }

    pub fn method(name: impl Into<String>, type_id: TypeId) -> Self {
        Self {
            is_method: true,
            ..Self::new(name, type_id)
        }
    }
}

/// Structural object shape with optional index signatures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub string_index: Option<TypeId>,
    pub number_index: Option<TypeId>,
}

impl ObjectShape {
    pub fn new(properties: Vec<PropertyInfo>) -> Self {
        Self {
            properties,
            string_index: None,
            number_index: None,
        }
    }

    pub fn has_index_signature(&self) -> bool {
        self.string_index.is_some() || self.number_index.is_some()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One position of a tuple type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub optional: bool,
}

impl TupleElement {
    pub const fn required(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: false,
        }
    }

    pub const fn optional(type_id: TypeId) -> Self {
        Self {
            type_id,
            optional: true,
        }
    }
}

/// Position of the first optional element, or the element count.
pub fn tuple_min_length(elements: &[TupleElement]) -> usize {
    elements
        .iter()
        .position(|e| e.optional)
        .unwrap_or(elements.len())
}

/// A span of a template literal type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TemplateSpan {
    Text(String),
    Type(TypeId),
}
