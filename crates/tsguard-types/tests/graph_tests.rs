use super::*;

#[test]
fn test_intrinsic_ids_are_fixed() {
    let graph = TypeGraph::new();
    assert_eq!(
        graph.lookup(TypeId::STRING),
        Some(&TypeData::Intrinsic(IntrinsicKind::String))
    );
    assert_eq!(
        graph.lookup(TypeId::FUNCTION),
        Some(&TypeData::Intrinsic(IntrinsicKind::Function))
    );
    assert_eq!(
        graph.lookup(TypeId::BOOLEAN_FALSE),
        Some(&TypeData::Literal(LiteralValue::Boolean(false)))
    );
    let date = graph.definition(DefId::DATE).unwrap();
    assert_eq!(date.builtin, Some(BuiltinClass::Date));
    assert_eq!(
        graph.lookup(TypeId::DATE),
        Some(&TypeData::Reference(TypeApplication {
            def: DefId::DATE,
            args: vec![],
        }))
    );
}

#[test]
fn test_structural_interning() {
    let mut graph = TypeGraph::new();
    let a = graph.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    let b = graph.object(vec![PropertyInfo::new("x", TypeId::NUMBER)]);
    let c = graph.object(vec![PropertyInfo::opt("x", TypeId::NUMBER)]);
    assert_eq!(a, b);
    assert_ne!(a, c);

    let foo1 = graph.literal_string("foo");
    let foo2 = graph.literal_string("foo");
    assert_eq!(foo1, foo2);
}

#[test]
fn test_type_params_are_never_merged() {
    let mut graph = TypeGraph::new();
    let t1 = graph.type_param("T", None);
    let t2 = graph.type_param("T", None);
    assert_ne!(t1, t2);
}

#[test]
fn test_union_flattening() {
    let mut graph = TypeGraph::new();
    let inner = graph.union(vec![TypeId::STRING, TypeId::NUMBER]);
    let outer = graph.union(vec![inner, TypeId::NULL, TypeId::STRING]);
    let Some(TypeData::Union(list)) = graph.lookup(outer).cloned() else {
        panic!("expected union");
    };
    assert_eq!(
        graph.type_list(list),
        &[TypeId::STRING, TypeId::NUMBER, TypeId::NULL]
    );

    assert_eq!(graph.union(vec![]), TypeId::NEVER);
    assert_eq!(graph.union(vec![TypeId::STRING]), TypeId::STRING);
}

#[test]
fn test_template_literal_merges_text() {
    let mut graph = TypeGraph::new();
    let plain = graph.template_literal(vec![
        TemplateSpan::Text("ab".into()),
        TemplateSpan::Text("cd".into()),
    ]);
    let abcd = graph.literal_string("abcd");
    assert_eq!(plain, abcd);

    let t = graph.template_literal(vec![
        TemplateSpan::Text("a".into()),
        TemplateSpan::Text("".into()),
        TemplateSpan::Text("b".into()),
        TemplateSpan::Type(TypeId::STRING),
    ]);
    let Some(TypeData::TemplateLiteral(list)) = graph.lookup(t).cloned() else {
        panic!("expected template literal");
    };
    assert_eq!(
        graph.template_list(list),
        &[TemplateSpan::Text("ab".into()), TemplateSpan::Type(TypeId::STRING)]
    );
}

#[test]
fn test_declarations_can_be_recursive() {
    let mut graph = TypeGraph::new();
    let def = graph.declare(DefKind::Interface, "Node");
    let node = graph.reference(def, vec![]);
    let children = graph.array(node);
    let body = graph.object(vec![PropertyInfo::new("children", children)]);
    graph.set_body(def, body);

    let info = graph.definition(def).unwrap();
    assert_eq!(info.body, Some(body));
    assert_eq!(graph.def_by_name("Node"), Some(def));
}

#[test]
fn test_tuple_min_length() {
    let elements = [
        TupleElement::required(TypeId::NUMBER),
        TupleElement::optional(TypeId::STRING),
    ];
    assert_eq!(tuple_min_length(&elements), 1);
    assert_eq!(tuple_min_length(&elements[..1]), 1);
    assert_eq!(tuple_min_length(&[]), 0);
}
