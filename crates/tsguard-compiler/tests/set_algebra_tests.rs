use super::*;
use crate::options::CompilerOptions;
use tsguard_types::{ObjectShape, TupleElement, TypeGraph};

fn set(values: &[&str]) -> LiteralSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn names(values: &[&str]) -> KeySet {
    KeySet::strings(set(values))
}

#[test]
fn test_union_laws() {
    let ab = set(&["a", "b"]);
    assert_eq!(ab.clone().union(LiteralSet::Always), LiteralSet::Always);
    assert_eq!(LiteralSet::Always.union(ab.clone()), LiteralSet::Always);
    assert_eq!(ab.clone().union(LiteralSet::Never), ab);
    assert_eq!(LiteralSet::Never.union(ab.clone()), ab);
    assert_eq!(ab.union(set(&["b", "c"])), set(&["a", "b", "c"]));
}

#[test]
fn test_intersect_laws() {
    let ab = set(&["a", "b"]);
    assert_eq!(ab.clone().intersect(LiteralSet::Never), LiteralSet::Never);
    assert_eq!(LiteralSet::Never.intersect(ab.clone()), LiteralSet::Never);
    assert_eq!(ab.clone().intersect(LiteralSet::Always), ab);
    assert_eq!(LiteralSet::Always.intersect(ab.clone()), ab);
    assert_eq!(ab.intersect(set(&["b", "c"])), set(&["b"]));
}

#[test]
fn test_disjoint_intersection_is_empty() {
    let disjoint = set(&["a"]).intersect(set(&["b"]));
    assert!(disjoint.is_empty());
    assert_ne!(disjoint, LiteralSet::Never);
    assert!(!LiteralSet::<String>::Always.is_empty());
}

fn context(graph: &TypeGraph) -> VisitorContext<'_> {
    VisitorContext::new(graph, CompilerOptions::default())
}

#[test]
fn test_keys_of_object_and_index_signatures() {
    let mut graph = TypeGraph::new();
    let plain = graph.object(vec![
        PropertyInfo::new("a", TypeId::NUMBER),
        PropertyInfo::opt("b", TypeId::STRING),
    ]);
    let mut numbered = ObjectShape::new(vec![PropertyInfo::new("name", TypeId::STRING)]);
    numbered.number_index = Some(TypeId::STRING);
    let numbered = graph.object_with_index(numbered);
    let mut dict = ObjectShape::new(vec![]);
    dict.string_index = Some(TypeId::NUMBER);
    let dict = graph.object_with_index(dict);

    let mut cx = context(&graph);
    assert_eq!(cx.keys_of(plain).unwrap(), names(&["a", "b"]));
    assert_eq!(
        cx.keys_of(numbered).unwrap(),
        KeySet {
            strings: set(&["name"]),
            numbers: LiteralSet::Always,
        }
    );
    assert_eq!(cx.keys_of(dict).unwrap(), KeySet::always());
}

#[test]
fn test_keys_of_union_and_intersection() {
    let mut graph = TypeGraph::new();
    let ab = graph.object(vec![
        PropertyInfo::new("a", TypeId::NUMBER),
        PropertyInfo::new("b", TypeId::NUMBER),
    ]);
    let bc = graph.object(vec![
        PropertyInfo::new("b", TypeId::NUMBER),
        PropertyInfo::new("c", TypeId::NUMBER),
    ]);
    let either = graph.union(vec![ab, bc]);
    let both = graph.intersection(vec![ab, bc]);

    let mut cx = context(&graph);
    assert_eq!(cx.keys_of(either).unwrap(), names(&["b"]));
    assert_eq!(cx.keys_of(both).unwrap(), names(&["a", "b", "c"]));
}

#[test]
fn test_keys_of_arrays_tuples_and_primitives() {
    let mut graph = TypeGraph::new();
    let list = graph.array(TypeId::STRING);
    let pair = graph.tuple(vec![
        TupleElement::required(TypeId::STRING),
        TupleElement::optional(TypeId::NUMBER),
    ]);

    let mut cx = context(&graph);
    assert_eq!(cx.keys_of(list).unwrap(), KeySet::numbers(LiteralSet::Always));
    assert_eq!(
        cx.keys_of(pair).unwrap(),
        KeySet::numbers([OrderedFloat(0.0), OrderedFloat(1.0)].into_iter().collect())
    );
    assert_eq!(cx.keys_of(TypeId::STRING).unwrap(), KeySet::never());
    assert_eq!(cx.keys_of(TypeId::ANY).unwrap(), KeySet::always());
    assert_eq!(cx.keys_of(TypeId::DATE).unwrap(), KeySet::never());
}

#[test]
fn test_index_key_set_of_union_and_keyof() {
    let mut graph = TypeGraph::new();
    let a = graph.literal_string("a");
    let zero = graph.literal_number(0.0);
    let mixed = graph.union(vec![a, zero]);
    let shape = graph.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    let keys = graph.keyof(shape);

    let mut cx = context(&graph);
    assert_eq!(
        cx.index_key_set(mixed).unwrap(),
        KeySet {
            strings: set(&["a"]),
            numbers: LiteralSet::single(OrderedFloat(0.0)),
        }
    );
    assert_eq!(cx.index_key_set(keys).unwrap(), names(&["x"]));
    assert_eq!(
        cx.index_key_set(TypeId::STRING).unwrap(),
        KeySet::strings(LiteralSet::Always)
    );
    assert_eq!(cx.index_key_set(TypeId::BOOLEAN).unwrap(), KeySet::never());
}

#[test]
fn test_declared_names_of_intersection_members() {
    let mut graph = TypeGraph::new();
    let a = graph.object(vec![PropertyInfo::new("a", TypeId::NUMBER)]);
    let named = graph.interface("Named", vec![PropertyInfo::new("name", TypeId::STRING)]);
    let mut dict = ObjectShape::new(vec![]);
    dict.string_index = Some(TypeId::ANY);
    let dict = graph.object_with_index(dict);

    let mut cx = context(&graph);
    assert_eq!(cx.declared_names(a).unwrap(), set(&["a"]));
    assert_eq!(cx.declared_names(named).unwrap(), set(&["name"]));
    assert_eq!(cx.declared_names(dict).unwrap(), LiteralSet::Always);
    assert_eq!(cx.declared_names(TypeId::NUMBER).unwrap(), LiteralSet::Never);
}

#[test]
fn test_declared_names_with_number_index_admit_any_key() {
    let mut graph = TypeGraph::new();
    let mut list = ObjectShape::new(vec![PropertyInfo::new("length", TypeId::NUMBER)]);
    list.number_index = Some(TypeId::STRING);
    let list = graph.object_with_index(list);

    let mut cx = context(&graph);
    assert_eq!(cx.declared_names(list).unwrap(), LiteralSet::Always);
}

#[test]
fn test_missing_key_on_union_member_fails() {
    let mut graph = TypeGraph::new();
    let a = graph.object(vec![PropertyInfo::new("k", TypeId::NUMBER)]);
    let b = graph.object(vec![PropertyInfo::new("other", TypeId::NUMBER)]);
    let either = graph.union(vec![a, b]);

    let mut cx = context(&graph);
    let err = cx.access(either, &names(&["k"])).unwrap_err();
    assert!(matches!(err, CompileError::IndexDoesNotExist { .. }));
}

#[test]
fn test_intersection_access_skips_members_without_key() {
    let mut graph = TypeGraph::new();
    let a = graph.object(vec![PropertyInfo::new("k", TypeId::NUMBER)]);
    let b = graph.object(vec![PropertyInfo::new("other", TypeId::STRING)]);
    let both = graph.intersection(vec![a, b]);

    let mut cx = context(&graph);
    let access = cx.access(both, &names(&["k"])).unwrap();
    assert_eq!(
        access,
        Access::AllOf(vec![Access::Member(Binding::closed(TypeId::NUMBER))])
    );
}
