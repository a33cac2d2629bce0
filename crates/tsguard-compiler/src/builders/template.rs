//! Template literal types.

use tsguard_types::utils::js_number_to_string;
use tsguard_types::{DefKind, IntrinsicKind, LiteralValue, TemplateSpan, TypeData, TypeId};

use crate::context::VisitorContext;
use crate::error::Result;
use crate::program::Check;
use crate::template::{Placeholder, TemplatePattern, TemplateSegment};

impl<'g> VisitorContext<'g> {
    pub(crate) fn build_template_literal(&mut self, type_id: TypeId) -> Result<Check> {
        let segments = self.template_segments(type_id)?;
        Ok(Check::Template(TemplatePattern {
            segments: merge_text(segments),
            display: self.format(type_id),
        }))
    }

    /// What `type_id` matches when it appears inside a template. Nested
    /// templates are inlined; aliases and type parameters are looked through.
    fn template_segments(&mut self, type_id: TypeId) -> Result<Vec<TemplateSegment>> {
        let placeholder = match self.lookup(type_id)? {
            TypeData::TemplateLiteral(list) => {
                let mut segments = Vec::new();
                for span in self.graph.template_list(list).to_vec() {
                    match span {
                        TemplateSpan::Text(text) => segments.push(TemplateSegment::Text(text)),
                        TemplateSpan::Type(inner) => segments.extend(self.template_segments(inner)?),
                    }
                }
                return Ok(segments);
            }
            TypeData::Intrinsic(IntrinsicKind::String | IntrinsicKind::Any | IntrinsicKind::Unknown) => {
                Placeholder::String
            }
            TypeData::Intrinsic(IntrinsicKind::Number) => Placeholder::Number,
            TypeData::Intrinsic(IntrinsicKind::Bigint) => Placeholder::BigInt,
            TypeData::Intrinsic(IntrinsicKind::Boolean) => {
                literals(["false".to_string(), "true".to_string()])
            }
            TypeData::Intrinsic(IntrinsicKind::Null) => literals(["null".to_string()]),
            TypeData::Intrinsic(IntrinsicKind::Undefined) => literals(["undefined".to_string()]),
            TypeData::Intrinsic(IntrinsicKind::Never) => literals([]),
            TypeData::Literal(value) => literals([literal_text(&value)]),
            TypeData::Union(list) => {
                let mut options = Vec::new();
                for member in self.graph.type_list(list).to_vec() {
                    options.push(merge_text(self.template_segments(member)?));
                }
                union_placeholder(options)
            }
            TypeData::TypeParameter(_) => {
                let binding = self.resolve_param(type_id)?;
                return self.follow(type_id, |cx| {
                    cx.with_frame(binding.env, |cx| cx.template_segments(binding.type_id))
                });
            }
            TypeData::Reference(app) => {
                let def = self.definition(app.def)?;
                let (DefKind::TypeAlias, Some(body)) = (def.kind, def.body) else {
                    return Err(self.unsupported(type_id, "cannot appear in a template literal"));
                };
                let env = self.substitution_for(&app)?;
                return self.follow(type_id, |cx| {
                    cx.with_frame(env, |cx| cx.template_segments(body))
                });
            }
            TypeData::Intrinsic(IntrinsicKind::Object | IntrinsicKind::Function)
            | TypeData::Object(_)
            | TypeData::Array(_)
            | TypeData::Tuple(_)
            | TypeData::Intersection(_)
            | TypeData::KeyOf(_)
            | TypeData::IndexAccess(..) => {
                return Err(self.unsupported(type_id, "cannot appear in a template literal"));
            }
        };
        Ok(vec![TemplateSegment::Placeholder(placeholder)])
    }
}

fn literal_text(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Boolean(b) => b.to_string(),
        LiteralValue::Number(n) => js_number_to_string(n.0),
        LiteralValue::String(s) => s.clone(),
    }
}

fn literals(values: impl IntoIterator<Item = String>) -> Placeholder {
    let mut values: Vec<String> = values.into_iter().collect();
    values.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    values.dedup();
    Placeholder::Literals(values)
}

/// Alternatives that are all plain text or literal lists fold into one list.
fn union_placeholder(options: Vec<Vec<TemplateSegment>>) -> Placeholder {
    let mut flat = Vec::new();
    for option in &options {
        match option.as_slice() {
            [] => flat.push(String::new()),
            [TemplateSegment::Text(text)] => flat.push(text.clone()),
            [TemplateSegment::Placeholder(Placeholder::Literals(values))] => {
                flat.extend(values.iter().cloned());
            }
            _ => return Placeholder::Alternatives(options),
        }
    }
    literals(flat)
}

fn merge_text(segments: Vec<TemplateSegment>) -> Vec<TemplateSegment> {
    let mut merged: Vec<TemplateSegment> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            TemplateSegment::Text(text) if text.is_empty() => {}
            TemplateSegment::Text(text) => {
                if let Some(TemplateSegment::Text(prev)) = merged.last_mut() {
                    prev.push_str(&text);
                } else {
                    merged.push(TemplateSegment::Text(text));
                }
            }
            other => merged.push(other),
        }
    }
    merged
}
