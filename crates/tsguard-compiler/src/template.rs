//! Template literal patterns and their matcher.
//!
//! A pattern is the flattened form of a template literal type: literal text
//! interleaved with placeholders. Nested templates are inlined at compile
//! time; unions that cannot be reduced to a literal list stay as
//! [`Placeholder::Alternatives`].

use rustc_hash::FxHashSet;
use serde::Serialize;

use tsguard_types::utils::{is_bigint_string, is_numeric_string};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Placeholder {
    /// `${string}`: any text, including empty.
    String,
    /// `${number}`: text accepted by `isFinite(+text)`.
    Number,
    /// `${bigint}`: an optionally negative integer.
    BigInt,
    /// One of these exact strings, sorted shortest first.
    Literals(Vec<String>),
    /// One of these sub-patterns.
    Alternatives(Vec<Vec<TemplateSegment>>),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TemplateSegment {
    Text(String),
    Placeholder(Placeholder),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TemplatePattern {
    pub segments: Vec<TemplateSegment>,
    /// The template type as written, for failure messages.
    pub display: String,
}

impl TemplatePattern {
    pub fn matches(&self, input: &str) -> bool {
        let mut steps = vec![Step::Accept];
        let start = lower(&mut steps, &self.segments, 0);
        run(&steps, start, input)
    }
}

/// One state of the flattened pattern. `usize` fields index the step list.
enum Step<'p> {
    Accept,
    Text(&'p str, usize),
    Span(&'p Placeholder, usize),
    Split(Vec<usize>),
}

/// Lowers `segments` back to front so each step knows its continuation.
/// Literal lists and alternatives become splits sharing that continuation.
fn lower<'p>(steps: &mut Vec<Step<'p>>, segments: &'p [TemplateSegment], next: usize) -> usize {
    let mut cont = next;
    for segment in segments.iter().rev() {
        let step = match segment {
            TemplateSegment::Text(text) => Step::Text(text, cont),
            TemplateSegment::Placeholder(Placeholder::Literals(options)) => {
                let mut targets = Vec::with_capacity(options.len());
                for option in options {
                    steps.push(Step::Text(option, cont));
                    targets.push(steps.len() - 1);
                }
                Step::Split(targets)
            }
            TemplateSegment::Placeholder(Placeholder::Alternatives(options)) => {
                let mut targets = Vec::with_capacity(options.len());
                for option in options {
                    targets.push(lower(steps, option, cont));
                }
                Step::Split(targets)
            }
            TemplateSegment::Placeholder(kind) => Step::Span(kind, cont),
        };
        steps.push(step);
        cont = steps.len() - 1;
    }
    cont
}

/// Walks the input left to right, visiting each `(step, offset)` state at
/// most once. `${string}` consumes one char per state.
fn run(steps: &[Step<'_>], start: usize, input: &str) -> bool {
    let mut pending: Vec<Vec<usize>> = vec![Vec::new(); input.len() + 1];
    let mut visited: FxHashSet<(usize, usize)> = FxHashSet::default();
    pending[0].push(start);

    for offset in 0..=input.len() {
        let mut stack = std::mem::take(&mut pending[offset]);
        while let Some(index) = stack.pop() {
            if !visited.insert((index, offset)) {
                continue;
            }
            let rest = &input[offset..];
            let mut schedule = |step: usize, len: usize| {
                if len == 0 {
                    stack.push(step);
                } else {
                    pending[offset + len].push(step);
                }
            };
            match &steps[index] {
                Step::Accept => {
                    if rest.is_empty() {
                        return true;
                    }
                }
                Step::Text(text, next) => {
                    if rest.starts_with(text) {
                        schedule(*next, text.len());
                    }
                }
                Step::Split(targets) => {
                    for &target in targets {
                        schedule(target, 0);
                    }
                }
                Step::Span(Placeholder::String, next) => {
                    schedule(*next, 0);
                    if let Some(ch) = rest.chars().next() {
                        schedule(index, ch.len_utf8());
                    }
                }
                Step::Span(kind, next) => {
                    // Numeric spans are ASCII, so every end inside the run is a char boundary.
                    let run_len = rest
                        .find(|c: char| !c.is_ascii_alphanumeric() && !matches!(c, '+' | '-' | '.'))
                        .unwrap_or(rest.len());
                    for end in 1..=run_len {
                        if accepts_span(kind, &rest[..end]) {
                            schedule(*next, end);
                        }
                    }
                }
            }
        }
    }
    false
}

fn accepts_span(kind: &Placeholder, span: &str) -> bool {
    match kind {
        Placeholder::String => true,
        Placeholder::Number => is_numeric_string(span),
        Placeholder::BigInt => is_bigint_string(span),
        Placeholder::Literals(_) | Placeholder::Alternatives(_) => false,
    }
}

#[cfg(test)]
#[path = "../tests/template_tests.rs"]
mod tests;
