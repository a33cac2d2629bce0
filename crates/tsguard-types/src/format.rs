//! Type formatting - render a `TypeId` as TypeScript-like syntax.
//!
//! Used for compile error messages and for deriving readable validator names.
//! References print as their declaration name, so recursive declarations never
//! recurse here.

use crate::graph::TypeGraph;
use crate::types::{LiteralValue, TemplateSpan, TypeData, TypeId};
use crate::utils::{js_number_to_string, quote_string};

/// Prints types as TypeScript syntax.
///
/// ```
/// use tsguard_types::{TypeFormatter, TypeGraph, TypeId};
///
/// let mut graph = TypeGraph::new();
/// let arr = graph.array(TypeId::NUMBER);
/// assert_eq!(TypeFormatter::new(&graph).format(arr), "number[]");
/// ```
pub struct TypeFormatter<'a> {
    graph: &'a TypeGraph,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(graph: &'a TypeGraph) -> Self {
        Self { graph }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let Some(data) = self.graph.lookup(type_id) else {
            return format!("<unknown type {}>", type_id.0);
        };

        match data {
            TypeData::Intrinsic(kind) => kind.as_str().to_string(),
            TypeData::Literal(literal) => format_literal(literal),
            TypeData::TypeParameter(info) => info.name.clone(),
            TypeData::Reference(app) => {
                let name = self
                    .graph
                    .definition(app.def)
                    .map_or("<unknown>", |def| def.name.as_str());
                if app.args.is_empty() {
                    name.to_string()
                } else {
                    format!("{}<{}>", name, self.format_list(&app.args, ", "))
                }
            }
            TypeData::Object(shape_id) => {
                let Some(shape) = self.graph.object_shape(*shape_id) else {
                    return "{}".to_string();
                };
                let mut members: Vec<String> = Vec::new();
                for prop in &shape.properties {
                    let optional = if prop.optional { "?" } else { "" };
                    if prop.is_method {
                        members.push(format!("{}{}(): unknown", prop.name, optional));
                    } else {
                        members.push(format!(
                            "{}{}: {}",
                            prop.name,
                            optional,
                            self.format(prop.type_id)
                        ));
                    }
                }
                if let Some(index) = shape.string_index {
                    members.push(format!("[key: string]: {}", self.format(index)));
                }
                if let Some(index) = shape.number_index {
                    members.push(format!("[index: number]: {}", self.format(index)));
                }
                if members.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", members.join("; "))
                }
            }
            TypeData::Array(element) => {
                let inner = self.format(*element);
                if self.needs_parens(*element) {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                }
            }
            TypeData::Tuple(list) => {
                let elements: Vec<String> = self
                    .graph
                    .tuple_list(*list)
                    .iter()
                    .map(|e| {
                        let ty = self.format(e.type_id);
                        if e.optional { format!("{ty}?") } else { ty }
                    })
                    .collect();
                format!("[{}]", elements.join(", "))
            }
            TypeData::Union(list) => self.format_list(self.graph.type_list(*list), " | "),
            TypeData::Intersection(list) => self.format_list(self.graph.type_list(*list), " & "),
            TypeData::KeyOf(operand) => format!("keyof {}", self.format_operand(*operand)),
            TypeData::IndexAccess(object, index) => {
                format!("{}[{}]", self.format_operand(*object), self.format(*index))
            }
            TypeData::TemplateLiteral(list) => {
                let mut out = String::from("`");
                for span in self.graph.template_list(*list) {
                    match span {
                        TemplateSpan::Text(text) => out.push_str(&text.replace('`', "\\`")),
                        TemplateSpan::Type(ty) => {
                            out.push_str("${");
                            out.push_str(&self.format(*ty));
                            out.push('}');
                        }
                    }
                }
                out.push('`');
                out
            }
        }
    }

    fn format_list(&self, members: &[TypeId], separator: &str) -> String {
        members
            .iter()
            .map(|&m| {
                if separator != ", " && self.needs_parens(m) {
                    format!("({})", self.format(m))
                } else {
                    self.format(m)
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn format_operand(&self, type_id: TypeId) -> String {
        if self.needs_parens(type_id) {
            format!("({})", self.format(type_id))
        } else {
            self.format(type_id)
        }
    }

    fn needs_parens(&self, type_id: TypeId) -> bool {
        matches!(
            self.graph.lookup(type_id),
            Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::KeyOf(_))
        )
    }
}

/// Render a literal type the way it is written in source.
pub fn format_literal(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Number(n) => js_number_to_string(n.0),
        LiteralValue::String(s) => quote_string(s),
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
