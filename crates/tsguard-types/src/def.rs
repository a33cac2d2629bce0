//! Declarations: type aliases, interfaces and classes.
//!
//! A `Reference` type points at a [`DefId`]; the definition supplies the
//! declared type parameters, the body and (for interfaces and classes) the
//! heritage clauses whose properties are inherited.
//!
//! | Kind | Body | Heritage |
//! |------|------|----------|
//! | TypeAlias | any type | - |
//! | Interface | object shape with own members | `extends` references |
//! | Class | instance shape with own members | `extends` reference |

use crate::types::TypeId;

/// Identifier of a declaration in a [`TypeGraph`](crate::TypeGraph).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefId(pub u32);

impl DefId {
    /// The host `Date` class, declared by every graph.
    pub const DATE: DefId = DefId(0);
}

/// Kind of declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// `type Foo<T> = T | null`
    TypeAlias,
    /// `interface Point { x: number; y: number }`
    Interface,
    /// `class User { name: string }`
    Class,
}

impl DefKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TypeAlias => "type alias",
            Self::Interface => "interface",
            Self::Class => "class",
        }
    }
}

/// Host classes with a dedicated runtime check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinClass {
    Date,
}

/// Stored declaration data.
#[derive(Clone, Debug)]
pub struct DefinitionInfo {
    pub kind: DefKind,
    pub name: String,
    /// `TypeParameter` nodes, in declaration order.
    pub type_params: Vec<TypeId>,
    /// Unset until the declaration is defined; recursive declarations are
    /// declared first and defined afterwards.
    pub body: Option<TypeId>,
    /// `extends` clauses, each a `Reference` type.
    pub heritage: Vec<TypeId>,
    pub builtin: Option<BuiltinClass>,
}

impl DefinitionInfo {
    pub fn new(kind: DefKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            type_params: Vec::new(),
            body: None,
            heritage: Vec::new(),
            builtin: None,
        }
    }

    pub const fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }
}
