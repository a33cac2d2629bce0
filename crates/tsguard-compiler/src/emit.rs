//! JavaScript emission.
//!
//! Renders a [`Program`] as a CommonJS module with one function per
//! validator. Each function returns `null` on success or an error object
//! `{ message, path, reason }` shaped like [`ErrorReport`](crate::ErrorReport).
//! The module carries a small shared prelude (path stack, `fail`, template
//! matcher) and exports an entry wrapper per root that resets the path.

use std::fmt::Write as _;

use tsguard_types::LiteralValue;
use tsguard_types::utils::{js_number_to_string, quote_string};

use crate::program::{Assertion, Check, ObjectCheck, Program, TupleCheck, ValidatorId};
use crate::reason::Reason;
use crate::template::{Placeholder, TemplateSegment};

const PRELUDE: &str = r#""use strict";

const path = ["$"];

function renderPath() {
    let out = "";
    for (let i = 0; i < path.length; i++) {
        const segment = path[i];
        out += i > 0 && !segment.startsWith("[") ? "." + segment : segment;
    }
    return out;
}

function fail(expected, reason) {
    return {
        message: "validation failed at " + renderPath() + ": " + expected,
        path: path.slice(),
        reason: reason,
    };
}

function hasOwn(value, key) {
    return Object.prototype.hasOwnProperty.call(value, key);
}

function isObject(value) {
    return typeof value === "object" && value !== null && !Array.isArray(value);
}

function isNumericKey(key) {
    return key === "NaN" || key === "Infinity" || key === "-Infinity" || String(Number(key)) === key;
}

function acceptsSpan(kind, span) {
    switch (kind) {
        case "string":
            return true;
        case "number":
            return span !== "" && span.trim() === span && isFinite(+span);
        case "bigint":
            return /^-?[0-9]+$/.test(span);
    }
    return false;
}

function lowerTemplate(segments, steps, next) {
    let cont = next;
    for (let i = segments.length - 1; i >= 0; i--) {
        const segment = segments[i];
        let step;
        if (segment.text !== undefined) {
            step = { text: segment.text, next: cont };
        } else if (segment.kind === "literals") {
            const targets = [];
            for (const value of segment.values) {
                steps.push({ text: value, next: cont });
                targets.push(steps.length - 1);
            }
            step = { split: targets };
        } else if (segment.kind === "alternatives") {
            step = { split: segment.options.map((option) => lowerTemplate(option, steps, cont)) };
        } else {
            step = { kind: segment.kind, next: cont };
        }
        steps.push(step);
        cont = steps.length - 1;
    }
    return cont;
}

function matchTemplate(segments, input) {
    const steps = [{ accept: true }];
    const pending = [[lowerTemplate(segments, steps, 0)]];
    const visited = new Set();
    for (let offset = 0; offset <= input.length; offset++) {
        const stack = pending[offset] || [];
        const schedule = (index, end) => {
            if (end === offset) {
                stack.push(index);
            } else {
                (pending[end] = pending[end] || []).push(index);
            }
        };
        while (stack.length > 0) {
            const index = stack.pop();
            const key = index * (input.length + 1) + offset;
            if (visited.has(key)) {
                continue;
            }
            visited.add(key);
            const step = steps[index];
            if (step.accept) {
                if (offset === input.length) {
                    return true;
                }
            } else if (step.split !== undefined) {
                for (const target of step.split) {
                    stack.push(target);
                }
            } else if (step.text !== undefined) {
                if (input.startsWith(step.text, offset)) {
                    schedule(step.next, offset + step.text.length);
                }
            } else if (step.kind === "string") {
                stack.push(step.next);
                if (offset < input.length) {
                    schedule(index, offset + 1);
                }
            } else {
                let end = offset;
                while (end < input.length && /[0-9A-Za-z+\-.]/.test(input[end])) {
                    end++;
                    if (acceptsSpan(step.kind, input.slice(offset, end))) {
                        schedule(step.next, end);
                    }
                }
            }
        }
    }
    return false;
}

function entry(validator) {
    return function (value) {
        path.length = 1;
        return validator(value);
    };
}
"#;

pub struct JsEmitter<'p> {
    program: &'p Program,
    output: String,
    indent_level: u32,
    temp_count: u32,
}

impl<'p> JsEmitter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            output: String::new(),
            indent_level: 0,
            temp_count: 0,
        }
    }

    /// The whole module: prelude, every validator, and exports for `roots`.
    pub fn emit_module(mut self, roots: &[ValidatorId]) -> String {
        self.write("// Generated by tsguard. Do not edit.\n");
        self.write(PRELUDE);
        for id in 0..self.program.len() {
            self.write_line();
            self.emit_function(ValidatorId(id as u32));
        }

        self.write_line();
        self.write("module.exports = {");
        self.write_line();
        self.increase_indent();
        if let [root] = roots {
            let name = self.name(*root).to_string();
            self.line(&format!("validate: entry({name}),"));
        }
        for root in roots {
            let name = self.name(*root).to_string();
            self.line(&format!("{name}: entry({name}),"));
        }
        self.decrease_indent();
        self.write("};");
        self.write_line();
        self.output
    }

    fn emit_function(&mut self, id: ValidatorId) {
        let program = self.program;
        let function = program.function(id);
        self.line(&format!("function {}(value) {{", function.name));
        self.increase_indent();
        self.line("let error;");
        self.emit_check(&function.body, "value");
        self.line("return null;");
        self.decrease_indent();
        self.line("}");
    }

    fn name(&self, id: ValidatorId) -> &'p str {
        &self.program.function(id).name
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    /// Statements that `return` an error when `value` fails `check`.
    fn emit_check(&mut self, check: &Check, value: &str) {
        match check {
            Check::Accept => {}
            Check::Reject(reason) => self.line(&format!("return {};", fail(reason))),
            Check::Call(id) => {
                let name = self.name(*id);
                self.line(&format!("if ((error = {name}({value}))) return error;"));
            }
            Check::Assert(assertion, reason) => {
                let condition = assertion_condition(assertion, value);
                self.line(&format!("if (!({condition})) return {};", fail(reason)));
            }
            Check::Conjunction(checks) => {
                for check in checks {
                    self.emit_check(check, value);
                }
            }
            Check::Disjunction(checks) => {
                let alternatives: Vec<String> = checks.iter().map(|c| self.expr(c, value)).collect();
                self.line(&format!(
                    "if ({}) return {};",
                    alternatives.join(" && "),
                    fail(&Reason::Union)
                ));
            }
            Check::Object(object) => self.emit_object(object, value),
            Check::Array(element) => {
                self.line(&format!(
                    "if (!Array.isArray({value})) return {};",
                    fail(&Reason::Array)
                ));
                let i = self.temp("i");
                self.line(&format!("for (let {i} = 0; {i} < {value}.length; {i}++) {{"));
                self.increase_indent();
                self.emit_keyed(
                    element,
                    &format!("\"[\" + {i} + \"]\""),
                    &format!("{value}[{i}]"),
                );
                self.decrease_indent();
                self.line("}");
            }
            Check::Tuple(tuple) => self.emit_tuple(tuple, value),
            Check::Template(pattern) => {
                let reason = Reason::TemplateLiteral {
                    pattern: pattern.display.clone(),
                };
                self.line(&format!(
                    "if (typeof {value} !== \"string\" || !matchTemplate({}, {value})) return {};",
                    template_segments(&pattern.segments),
                    fail(&reason)
                ));
            }
            Check::Superfluous(allowed) => {
                let allowed: Vec<String> = allowed.iter().map(|k| quote_string(k)).collect();
                let key = self.temp("key");
                self.line(&format!("if (isObject({value})) {{"));
                self.increase_indent();
                self.line(&format!("for (const {key} of Object.keys({value})) {{"));
                self.increase_indent();
                self.line(&format!(
                    "if (![{}].includes({key})) return fail(\"superfluous property '\" + {key} + \"' in object\", {{ type: \"superfluous-property\", property: {key} }});",
                    allowed.join(", ")
                ));
                self.decrease_indent();
                self.line("}");
                self.decrease_indent();
                self.line("}");
            }
        }
    }

    fn emit_object(&mut self, object: &ObjectCheck, value: &str) {
        self.line(&format!("if (!isObject({value})) return {};", fail(&Reason::Object)));
        for property in &object.properties {
            let key = quote_string(&property.name);
            let field = format!("{value}[{key}]");
            if property.optional {
                self.line(&format!("if (hasOwn({value}, {key}) && {field} !== undefined) {{"));
                self.increase_indent();
                self.emit_keyed(&property.check, &key, &field);
                self.decrease_indent();
                self.line("}");
            } else {
                let missing = Reason::MissingProperty {
                    property: property.name.clone(),
                };
                self.line(&format!("if (!hasOwn({value}, {key})) return {};", fail(&missing)));
                self.emit_keyed(&property.check, &key, &field);
            }
        }
        for (check, numeric) in [(&object.string_index, false), (&object.number_index, true)] {
            let Some(check) = check else {
                continue;
            };
            let key = self.temp("key");
            self.line(&format!("for (const {key} of Object.keys({value})) {{"));
            self.increase_indent();
            if numeric {
                self.line(&format!("if (!isNumericKey({key})) continue;"));
            }
            self.emit_keyed(check, &key, &format!("{value}[{key}]"));
            self.decrease_indent();
            self.line("}");
        }
    }

    fn emit_tuple(&mut self, tuple: &TupleCheck, value: &str) {
        self.line(&format!(
            "if (!Array.isArray({value})) return {};",
            fail(&Reason::Array)
        ));
        let reason = Reason::Tuple {
            min_length: tuple.min_length,
            max_length: tuple.max_length(),
        };
        self.line(&format!(
            "if ({value}.length < {} || {value}.length > {}) return {};",
            tuple.min_length,
            tuple.max_length(),
            fail(&reason)
        ));
        for (i, element) in tuple.elements.iter().enumerate() {
            let item = format!("{value}[{i}]");
            let segment = format!("\"[{i}]\"");
            if element.optional {
                self.line(&format!("if ({item} !== undefined) {{"));
                self.increase_indent();
                self.emit_keyed(&element.check, &segment, &item);
                self.decrease_indent();
                self.line("}");
            } else {
                self.emit_keyed(&element.check, &segment, &item);
            }
        }
    }

    /// Check `value` with `segment` pushed onto the path.
    fn emit_keyed(&mut self, check: &Check, segment: &str, value: &str) {
        let expr = self.expr(check, value);
        self.line(&format!("path.push({segment});"));
        self.line(&format!("error = {expr};"));
        self.line("path.pop();");
        self.line("if (error) return error;");
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    /// An expression evaluating to `null` or an error object.
    fn expr(&mut self, check: &Check, value: &str) -> String {
        match check {
            Check::Accept => "null".to_string(),
            Check::Reject(reason) => fail(reason),
            Check::Call(id) => format!("{}({value})", self.name(*id)),
            Check::Assert(assertion, reason) => format!(
                "({} ? null : {})",
                assertion_condition(assertion, value),
                fail(reason)
            ),
            Check::Conjunction(checks) => {
                let parts: Vec<String> = checks.iter().map(|c| self.expr(c, value)).collect();
                format!("({})", parts.join(" || "))
            }
            Check::Disjunction(checks) => {
                let mut parts: Vec<String> = checks.iter().map(|c| self.expr(c, value)).collect();
                parts.push(fail(&Reason::Union));
                format!("({})", parts.join(" && "))
            }
            Check::Object(_)
            | Check::Array(_)
            | Check::Tuple(_)
            | Check::Template(_)
            | Check::Superfluous(_) => self.immediate(check, value),
        }
    }

    /// A statement-form check wrapped as an immediately invoked arrow.
    fn immediate(&mut self, check: &Check, value: &str) -> String {
        let mut inner = JsEmitter {
            program: self.program,
            output: String::new(),
            indent_level: self.indent_level + 1,
            temp_count: self.temp_count,
        };
        inner.line("let error;");
        inner.emit_check(check, value);
        inner.line("return null;");
        self.temp_count = inner.temp_count;

        let mut out = String::from("(() => {\n");
        out.push_str(&inner.output);
        for _ in 0..self.indent_level {
            out.push_str("    ");
        }
        out.push_str("})()");
        out
    }

    fn temp(&mut self, prefix: &str) -> String {
        self.temp_count += 1;
        format!("{prefix}{}", self.temp_count)
    }

    // -------------------------------------------------------------------------
    // Writing
    // -------------------------------------------------------------------------

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str("    ");
        }
    }

    fn line(&mut self, text: &str) {
        self.write_indent();
        self.write(text);
        self.write_line();
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }
}

fn fail(reason: &Reason) -> String {
    let expected = quote_string(&reason.expectation());
    let reason = serde_json::to_string(reason).unwrap_or_else(|_| "null".to_string());
    format!("fail({expected}, {reason})")
}

fn assertion_condition(assertion: &Assertion, value: &str) -> String {
    match assertion {
        Assertion::Null => format!("{value} === null"),
        Assertion::Undefined => format!("{value} === undefined"),
        Assertion::Boolean => format!("typeof {value} === \"boolean\""),
        Assertion::Number => format!("typeof {value} === \"number\""),
        Assertion::BigInt => format!("typeof {value} === \"bigint\""),
        Assertion::String => format!("typeof {value} === \"string\""),
        Assertion::NonPrimitive => format!(
            "(typeof {value} === \"object\" && {value} !== null) || typeof {value} === \"function\""
        ),
        Assertion::Date => format!("{value} instanceof Date"),
        Assertion::Function => format!("typeof {value} === \"function\""),
        Assertion::Literal(LiteralValue::Boolean(b)) => format!("{value} === {b}"),
        Assertion::Literal(LiteralValue::Number(n)) => {
            format!("{value} === {}", js_number_to_string(n.0))
        }
        Assertion::Literal(LiteralValue::String(s)) => format!("{value} === {}", quote_string(s)),
    }
}

fn template_segments(segments: &[TemplateSegment]) -> String {
    let mut out = String::from("[");
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match segment {
            TemplateSegment::Text(text) => {
                let _ = write!(out, "{{ text: {} }}", quote_string(text));
            }
            TemplateSegment::Placeholder(Placeholder::String) => out.push_str("{ kind: \"string\" }"),
            TemplateSegment::Placeholder(Placeholder::Number) => out.push_str("{ kind: \"number\" }"),
            TemplateSegment::Placeholder(Placeholder::BigInt) => out.push_str("{ kind: \"bigint\" }"),
            TemplateSegment::Placeholder(Placeholder::Literals(values)) => {
                let values: Vec<String> = values.iter().map(|v| quote_string(v)).collect();
                let _ = write!(out, "{{ kind: \"literals\", values: [{}] }}", values.join(", "));
            }
            TemplateSegment::Placeholder(Placeholder::Alternatives(options)) => {
                let options: Vec<String> = options.iter().map(|o| template_segments(o)).collect();
                let _ = write!(
                    out,
                    "{{ kind: \"alternatives\", options: [{}] }}",
                    options.join(", ")
                );
            }
        }
    }
    out.push(']');
    out
}

#[cfg(test)]
#[path = "../tests/emit_tests.rs"]
mod tests;
