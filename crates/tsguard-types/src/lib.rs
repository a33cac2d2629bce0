//! Structural type graph for the tsguard validator compiler.
//!
//! This crate is the compiler's view of the type system front end:
//!
//! - **`TypeGraph`**: interning arena for type nodes (`TypeId` handles, O(1) identity)
//! - **Declarations**: aliases, interfaces and classes with type parameters,
//!   defaults and `extends` clauses
//! - **`TypeFormatter`**: TypeScript-like rendering for diagnostics
//! - **Type documents**: a JSON serialization of declarations, lowered into a graph
//!
//! The compiler never mutates a graph; it only needs `&TypeGraph`.

pub mod def;
pub mod document;
mod format;
mod graph;
pub mod types;
pub mod utils;

pub use def::{BuiltinClass, DefId, DefKind, DefinitionInfo};
pub use document::{DocumentError, LoadedDocument, TypeDocument, TypeExpr};
pub use format::{TypeFormatter, format_literal};
pub use graph::TypeGraph;
pub use types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, OrderedFloat, ParamId, PropertyInfo,
    TemplateLiteralId, TemplateSpan, TupleElement, TupleListId, TypeApplication, TypeData, TypeId,
    TypeListId, TypeParamInfo, tuple_min_length,
};

#[cfg(test)]
#[path = "../tests/graph_tests.rs"]
mod graph_tests;
