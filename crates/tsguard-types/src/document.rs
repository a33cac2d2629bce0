//! JSON type documents.
//!
//! A type document is the serialized form of the declarations a front end hands
//! to the compiler:
//!
//! ```json
//! {
//!   "declarations": {
//!     "Box": {
//!       "kind": "interface",
//!       "typeParameters": [{ "name": "T" }],
//!       "properties": [{ "name": "value", "type": { "param": "T" } }]
//!     },
//!     "Names": { "kind": "alias", "type": { "array": "string" } }
//!   }
//! }
//! ```
//!
//! Loading happens in two passes: every declaration is declared first so
//! bodies may refer to each other (and to themselves) in any order.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::def::{DefId, DefKind};
use crate::graph::TypeGraph;
use crate::types::{
    IntrinsicKind, ObjectShape, PropertyInfo, TemplateSpan, TupleElement, TypeId,
};

/// Errors raised while lowering a document into a [`TypeGraph`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse type document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown type name '{name}'")]
    UnknownName { name: String },

    #[error("unknown type parameter '{name}' in '{declaration}'")]
    UnknownParameter { name: String, declaration: String },

    #[error("duplicate declaration '{name}'")]
    DuplicateDeclaration { name: String },

    #[error("'{name}' expects {expected} type argument(s), got {actual}")]
    ArgumentCount {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, DocumentError>;

/// Top-level document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeDocument {
    #[serde(default)]
    pub declarations: IndexMap<String, Declaration>,
}

/// A named declaration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Declaration {
    Alias {
        #[serde(default, rename = "typeParameters")]
        type_parameters: Vec<TypeParameterDecl>,
        #[serde(rename = "type")]
        ty: TypeExpr,
    },
    Interface {
        #[serde(default, rename = "typeParameters")]
        type_parameters: Vec<TypeParameterDecl>,
        #[serde(default)]
        extends: Vec<TypeExpr>,
        #[serde(flatten)]
        shape: ShapeExpr,
    },
    Class {
        #[serde(default, rename = "typeParameters")]
        type_parameters: Vec<TypeParameterDecl>,
        #[serde(default)]
        extends: Vec<TypeExpr>,
        #[serde(flatten)]
        shape: ShapeExpr,
    },
}

impl Declaration {
    fn kind(&self) -> DefKind {
        match self {
            Self::Alias { .. } => DefKind::TypeAlias,
            Self::Interface { .. } => DefKind::Interface,
            Self::Class { .. } => DefKind::Class,
        }
    }

    fn type_parameters(&self) -> &[TypeParameterDecl] {
        match self {
            Self::Alias {
                type_parameters, ..
            }
            | Self::Interface {
                type_parameters, ..
            }
            | Self::Class {
                type_parameters, ..
            } => type_parameters,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub name: String,
    #[serde(default)]
    pub default: Option<TypeExpr>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeExpr {
    #[serde(default)]
    pub properties: Vec<PropertyDecl>,
    #[serde(default)]
    pub string_index: Option<Box<TypeExpr>>,
    #[serde(default)]
    pub number_index: Option<Box<TypeExpr>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub method: bool,
}

/// Literal payload of `{"literal": ...}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralExpr {
    Boolean(bool),
    Number(f64),
    String(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TupleElementExpr {
    Detailed {
        #[serde(rename = "type")]
        ty: TypeExpr,
        #[serde(default)]
        optional: bool,
    },
    Plain(TypeExpr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplatePartExpr {
    Text(String),
    Type(TypeExpr),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefExpr {
    pub name: String,
    #[serde(default)]
    pub args: Vec<TypeExpr>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexExpr {
    pub object: Box<TypeExpr>,
    pub index: Box<TypeExpr>,
}

/// A type expression.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeExpr {
    Any,
    Unknown,
    Never,
    Null,
    Undefined,
    Boolean,
    Number,
    Bigint,
    String,
    Object,
    Function,
    Date,
    Literal(LiteralExpr),
    Ref(RefExpr),
    Param(String),
    Shape(ShapeExpr),
    Array(Box<TypeExpr>),
    Tuple(Vec<TupleElementExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Keyof(Box<TypeExpr>),
    Index(IndexExpr),
    Template(Vec<TemplatePartExpr>),
}

/// Result of loading a document: declaration names mapped to their ids.
#[derive(Clone, Debug, Default)]
pub struct LoadedDocument {
    pub declarations: IndexMap<String, DefId>,
}

impl LoadedDocument {
    pub fn def(&self, name: &str) -> Option<DefId> {
        self.declarations.get(name).copied()
    }
}

impl TypeDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Lower every declaration into `graph`.
    pub fn load(&self, graph: &mut TypeGraph) -> Result<LoadedDocument> {
        let mut loaded = LoadedDocument::default();

        for (name, decl) in &self.declarations {
            if graph.def_by_name(name).is_some() {
                return Err(DocumentError::DuplicateDeclaration { name: name.clone() });
            }
            let def = graph.declare(decl.kind(), name.clone());
            loaded.declarations.insert(name.clone(), def);
        }

        for (name, decl) in &self.declarations {
            let def = loaded.declarations[name];
            let mut lowering = Lowering {
                graph: &mut *graph,
                declaration: name,
                params: FxHashMap::default(),
            };

            let mut params = Vec::with_capacity(decl.type_parameters().len());
            for param in decl.type_parameters() {
                let default = match &param.default {
                    Some(expr) => Some(lowering.lower(expr)?),
                    None => None,
                };
                let id = lowering.graph.type_param(param.name.clone(), default);
                lowering.params.insert(param.name.clone(), id);
                params.push(id);
            }
            lowering.graph.set_type_params(def, params);

            match decl {
                Declaration::Alias { ty, .. } => {
                    let body = lowering.lower(ty)?;
                    lowering.graph.set_body(def, body);
                }
                Declaration::Interface { extends, shape, .. }
                | Declaration::Class { extends, shape, .. } => {
                    let body = lowering.lower_shape(shape)?;
                    lowering.graph.set_body(def, body);
                    for base in extends {
                        let base = lowering.lower(base)?;
                        lowering.graph.add_heritage(def, base);
                    }
                }
            }
            debug!(declaration = %name, kind = decl.kind().as_str(), "loaded declaration");
        }

        Ok(loaded)
    }

    /// Lower a standalone expression against already loaded declarations.
    pub fn lower_expr(graph: &mut TypeGraph, expr: &TypeExpr) -> Result<TypeId> {
        Lowering {
            graph,
            declaration: "<root>",
            params: FxHashMap::default(),
        }
        .lower(expr)
    }
}

struct Lowering<'a> {
    graph: &'a mut TypeGraph,
    declaration: &'a str,
    params: FxHashMap<String, TypeId>,
}

impl Lowering<'_> {
    fn lower(&mut self, expr: &TypeExpr) -> Result<TypeId> {
        let id = match expr {
            TypeExpr::Any => TypeId::ANY,
            TypeExpr::Unknown => TypeId::UNKNOWN,
            TypeExpr::Never => TypeId::NEVER,
            TypeExpr::Null => TypeId::NULL,
            TypeExpr::Undefined => TypeId::UNDEFINED,
            TypeExpr::Boolean => TypeId::BOOLEAN,
            TypeExpr::Number => TypeId::NUMBER,
            TypeExpr::Bigint => TypeId::BIGINT,
            TypeExpr::String => TypeId::STRING,
            TypeExpr::Object => self.graph.intrinsic(IntrinsicKind::Object),
            TypeExpr::Function => TypeId::FUNCTION,
            TypeExpr::Date => TypeId::DATE,
            TypeExpr::Literal(LiteralExpr::Boolean(b)) => self.graph.literal_boolean(*b),
            TypeExpr::Literal(LiteralExpr::Number(n)) => self.graph.literal_number(*n),
            TypeExpr::Literal(LiteralExpr::String(s)) => self.graph.literal_string(s),
            TypeExpr::Ref(reference) => {
                let def = self.graph.def_by_name(&reference.name).ok_or_else(|| {
                    DocumentError::UnknownName {
                        name: reference.name.clone(),
                    }
                })?;
                let expected = self
                    .graph
                    .definition(def)
                    .map_or(0, |info| info.type_params.len());
                // Trailing arguments may be omitted when defaults exist; the
                // compiler reports parameters that end up unbound.
                if reference.args.len() > expected {
                    return Err(DocumentError::ArgumentCount {
                        name: reference.name.clone(),
                        expected,
                        actual: reference.args.len(),
                    });
                }
                let args = reference
                    .args
                    .iter()
                    .map(|arg| self.lower(arg))
                    .collect::<Result<Vec<_>>>()?;
                self.graph.reference(def, args)
            }
            TypeExpr::Param(name) => {
                *self
                    .params
                    .get(name)
                    .ok_or_else(|| DocumentError::UnknownParameter {
                        name: name.clone(),
                        declaration: self.declaration.to_string(),
                    })?
            }
            TypeExpr::Shape(shape) => self.lower_shape(shape)?,
            TypeExpr::Array(element) => {
                let element = self.lower(element)?;
                self.graph.array(element)
            }
            TypeExpr::Tuple(elements) => {
                let mut lowered = Vec::with_capacity(elements.len());
                for element in elements {
                    lowered.push(match element {
                        TupleElementExpr::Detailed { ty, optional } => TupleElement {
                            type_id: self.lower(ty)?,
                            optional: *optional,
                        },
                        TupleElementExpr::Plain(ty) => TupleElement::required(self.lower(ty)?),
                    });
                }
                self.graph.tuple(lowered)
            }
            TypeExpr::Union(members) => {
                let members = self.lower_all(members)?;
                self.graph.union(members)
            }
            TypeExpr::Intersection(members) => {
                let members = self.lower_all(members)?;
                self.graph.intersection(members)
            }
            TypeExpr::Keyof(operand) => {
                let operand = self.lower(operand)?;
                self.graph.keyof(operand)
            }
            TypeExpr::Index(access) => {
                let object = self.lower(&access.object)?;
                let index = self.lower(&access.index)?;
                self.graph.index_access(object, index)
            }
            TypeExpr::Template(parts) => {
                let mut spans = Vec::with_capacity(parts.len());
                for part in parts {
                    spans.push(match part {
                        TemplatePartExpr::Text(text) => TemplateSpan::Text(text.clone()),
                        TemplatePartExpr::Type(ty) => TemplateSpan::Type(self.lower(ty)?),
                    });
                }
                self.graph.template_literal(spans)
            }
        };
        Ok(id)
    }

    fn lower_all(&mut self, exprs: &[TypeExpr]) -> Result<Vec<TypeId>> {
        exprs.iter().map(|expr| self.lower(expr)).collect()
    }

    fn lower_shape(&mut self, shape: &ShapeExpr) -> Result<TypeId> {
        let mut properties = Vec::with_capacity(shape.properties.len());
        for prop in &shape.properties {
            properties.push(PropertyInfo {
                name: prop.name.clone(),
                type_id: self.lower(&prop.ty)?,
                optional: prop.optional,
                is_method: prop.method,
            });
        }
        let string_index = match &shape.string_index {
            Some(expr) => Some(self.lower(expr)?),
            None => None,
        };
        let number_index = match &shape.number_index {
            Some(expr) => Some(self.lower(expr)?),
            None => None,
        };
        Ok(self.graph.object_with_index(ObjectShape {
            properties,
            string_index,
            number_index,
        }))
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
