use super::*;
use crate::api::{compile, equals};
use crate::options::CompilerOptions;
use crate::program::Validator;
use crate::value::Value;
use serde_json::json;
use tsguard_types::{PropertyInfo, TemplateSpan, TupleElement, TypeGraph, TypeId};

fn emit(validator: &Validator) -> String {
    validator.to_javascript()
}

#[test]
fn test_module_shape() {
    let mut graph = TypeGraph::new();
    let ty = graph.object(vec![PropertyInfo::new("a", TypeId::NUMBER)]);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);

    assert!(js.starts_with("// Generated by tsguard. Do not edit.\n\"use strict\";"));
    assert!(js.contains("function _a_number(value) {"));
    assert!(js.contains("function _number(value) {"));
    assert!(js.contains("module.exports = {"));
    assert!(js.contains("    validate: entry(_a_number),"));
    assert!(js.contains("    _a_number: entry(_a_number),"));
    assert!(js.trim_end().ends_with("};"));
}

#[test]
fn test_missing_property_and_nested_call() {
    let mut graph = TypeGraph::new();
    let ty = graph.object(vec![
        PropertyInfo::new("a", TypeId::NUMBER),
        PropertyInfo::opt("b", TypeId::STRING),
    ]);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);

    assert!(js.contains(
        "if (!hasOwn(value, \"a\")) return fail(\"expected 'a' in object\", {\"type\":\"missing-property\",\"property\":\"a\"});"
    ));
    assert!(js.contains("path.push(\"a\");"));
    assert!(js.contains("error = _number(value[\"a\"]);"));
    assert!(js.contains("if (hasOwn(value, \"b\") && value[\"b\"] !== undefined) {"));
}

#[test]
fn test_array_loop_pushes_index_segment() {
    let mut graph = TypeGraph::new();
    let ty = graph.array(TypeId::STRING);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);

    assert!(js.contains("if (!Array.isArray(value)) return fail(\"expected an array\", {\"type\":\"array\"});"));
    assert!(js.contains("for (let i1 = 0; i1 < value.length; i1++) {"));
    assert!(js.contains("path.push(\"[\" + i1 + \"]\");"));
}

#[test]
fn test_tuple_bounds() {
    let mut graph = TypeGraph::new();
    let ty = graph.tuple(vec![
        TupleElement::required(TypeId::NUMBER),
        TupleElement::optional(TypeId::STRING),
    ]);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);

    assert!(js.contains(
        "if (value.length < 1 || value.length > 2) return fail(\"expected an array with length 1-2\", {\"type\":\"tuple\",\"minLength\":1,\"maxLength\":2});"
    ));
    assert!(js.contains("if (value[1] !== undefined) {"));
}

#[test]
fn test_union_reports_once() {
    let mut graph = TypeGraph::new();
    let ty = graph.union(vec![TypeId::STRING, TypeId::NULL]);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);

    assert!(js.contains("function _string_or_null(value) {"));
    assert!(js.contains(
        "if (_string(value) && _null(value)) return fail(\"there are no valid alternatives\", {\"type\":\"union\"});"
    ));
}

#[test]
fn test_superfluous_check_lists_allowed_keys() {
    let mut graph = TypeGraph::new();
    let ty = graph.object(vec![
        PropertyInfo::new("b", TypeId::NUMBER),
        PropertyInfo::new("a", TypeId::NUMBER),
    ]);
    let validator = equals(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);
    assert!(js.contains("if (![\"a\", \"b\"].includes(key1))"));
}

#[test]
fn test_template_pattern_literal() {
    let mut graph = TypeGraph::new();
    let ty = graph.template_literal(vec![
        TemplateSpan::Text("v".to_string()),
        TemplateSpan::Type(TypeId::NUMBER),
    ]);
    let validator = compile(&graph, ty, &CompilerOptions::default()).unwrap();
    let js = emit(&validator);
    assert!(js.contains("matchTemplate([{ text: \"v\" }, { kind: \"number\" }], value)"));
    // The prelude matcher records visited states.
    assert!(js.contains("function lowerTemplate(segments, steps, next)"));
    assert!(js.contains("visited.has(key)"));
}

#[test]
fn test_assertion_conditions() {
    assert_eq!(
        assertion_condition(&Assertion::Literal(LiteralValue::Number(1.5.into())), "x"),
        "x === 1.5"
    );
    assert_eq!(
        assertion_condition(&Assertion::Literal(LiteralValue::String("a\"b".into())), "x"),
        "x === \"a\\\"b\""
    );
    assert_eq!(assertion_condition(&Assertion::Date, "v"), "v instanceof Date");
}

#[test]
fn test_fail_embeds_reason_json() {
    assert_eq!(
        fail(&Reason::StringLiteral {
            value: "on".to_string()
        }),
        "fail(\"expected string 'on'\", {\"type\":\"string-literal\",\"value\":\"on\"})"
    );
}

#[test]
fn test_nested_structural_check_is_wrapped() {
    let program = Program::from_functions(vec![crate::program::ValidatorFn {
        name: "_pair".to_string(),
        body: Check::Disjunction(vec![
            Check::Array(Box::new(Check::Accept)),
            Check::Assert(Assertion::Null, Reason::Null),
        ]),
    }]);
    let js = JsEmitter::new(&program).emit_module(&[ValidatorId(0)]);
    assert!(js.contains("if ((() => {"));
    assert!(js.contains("})() && (value === null ? null : fail(\"expected null\", {\"type\":\"null\"}))"));
}

/// Runs the emitted module under node and returns `validate(input)` for each
/// input. `None` when node is not installed.
fn run_in_node(module: &str, inputs: &[serde_json::Value]) -> Option<Vec<serde_json::Value>> {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("validator.js"), module).unwrap();
    let script = format!(
        "const {{ validate }} = require(\"./validator.js\");\n\
         const inputs = {};\n\
         process.stdout.write(JSON.stringify(inputs.map((input) => validate(input))));\n",
        serde_json::to_string(inputs).unwrap()
    );
    std::fs::write(dir.path().join("run.js"), script).unwrap();

    let output = std::process::Command::new("node")
        .arg("run.js")
        .current_dir(dir.path())
        .output()
        .ok()?;
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    Some(serde_json::from_slice(&output.stdout).unwrap())
}

fn interpret(validator: &Validator, inputs: &[serde_json::Value]) -> Vec<serde_json::Value> {
    inputs
        .iter()
        .map(|input| match validator.validate(&Value::from(input.clone())) {
            Ok(()) => serde_json::Value::Null,
            Err(report) => serde_json::to_value(&report).unwrap(),
        })
        .collect()
}

fn assert_same_in_node(validator: &Validator, inputs: &[serde_json::Value]) {
    let Some(from_node) = run_in_node(&emit(validator), inputs) else {
        return;
    };
    let expected = interpret(validator, inputs);
    for ((input, js), rust) in inputs.iter().zip(&from_node).zip(&expected) {
        assert_eq!(js, rust, "input {input}");
    }
}

#[test]
fn test_emitted_module_agrees_with_interpreter() {
    let options = CompilerOptions::default();
    let mut graph = TypeGraph::new();

    let nullable = graph.union(vec![TypeId::STRING, TypeId::NULL]);
    let record = graph.object(vec![
        PropertyInfo::new("a", nullable),
        PropertyInfo::opt("b", TypeId::BOOLEAN),
    ]);
    let validator = compile(&graph, record, &options).unwrap();
    assert_same_in_node(
        &validator,
        &[
            json!({"a": "x"}),
            json!({"a": null, "b": true}),
            json!({"a": 1}),
            json!({"a": "x", "b": "no"}),
            json!({}),
            json!([]),
        ],
    );

    let row = graph.array(TypeId::NUMBER);
    let grid = graph.array(row);
    let validator = compile(&graph, grid, &options).unwrap();
    assert_same_in_node(
        &validator,
        &[json!([[1], [2, 3]]), json!([[1], [2, "x"]]), json!([1]), json!("grid")],
    );

    let pair = graph.tuple(vec![
        TupleElement::required(TypeId::NUMBER),
        TupleElement::optional(TypeId::STRING),
    ]);
    let validator = compile(&graph, pair, &options).unwrap();
    assert_same_in_node(
        &validator,
        &[json!([1]), json!([1, "a"]), json!([]), json!([1, "a", 2]), json!([1, 2])],
    );

    let version = graph.template_literal(vec![
        TemplateSpan::Text("v".to_string()),
        TemplateSpan::Type(TypeId::NUMBER),
        TemplateSpan::Text(".".to_string()),
        TemplateSpan::Type(TypeId::STRING),
    ]);
    let validator = compile(&graph, version, &options).unwrap();
    assert_same_in_node(
        &validator,
        &[json!("v2.x"), json!("v2."), json!("vx.1"), json!("v2"), json!(3)],
    );
}

#[test]
fn test_emitted_exact_intersection_agrees_with_interpreter() {
    let mut graph = TypeGraph::new();
    let inner = graph.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    let left = graph.object(vec![PropertyInfo::new("foo", inner)]);
    let right = graph.object(vec![PropertyInfo::new("bar", TypeId::STRING)]);
    let both = graph.intersection(vec![left, right]);
    let validator = equals(&graph, both, &CompilerOptions::default()).unwrap();

    assert_same_in_node(
        &validator,
        &[
            json!({"foo": {"x": 1}, "bar": "b"}),
            json!({"foo": {"x": 1}, "bar": "b", "baz": 0}),
            json!({"foo": {"x": 1, "y": 2}, "bar": "b"}),
            json!({"foo": {"x": "1"}, "bar": "b"}),
            json!({"bar": "b"}),
        ],
    );
}
