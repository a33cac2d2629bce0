use super::*;
use crate::types::TypeData;

#[test]
fn test_load_interface_with_generics() {
    let doc = TypeDocument::from_json(
        r#"{
            "declarations": {
                "Box": {
                    "kind": "interface",
                    "typeParameters": [{ "name": "T" }],
                    "properties": [
                        { "name": "value", "type": { "param": "T" } },
                        { "name": "label", "type": "string", "optional": true }
                    ]
                }
            }
        }"#,
    )
    .unwrap();

    let mut graph = TypeGraph::new();
    let loaded = doc.load(&mut graph).unwrap();
    let def = loaded.def("Box").unwrap();
    let info = graph.definition(def).unwrap();
    assert_eq!(info.kind, DefKind::Interface);
    assert_eq!(info.type_params.len(), 1);

    let Some(TypeData::Object(shape)) = graph.lookup(info.body.unwrap()) else {
        panic!("interface body should be an object shape");
    };
    let shape = graph.object_shape(*shape).unwrap();
    assert_eq!(shape.properties.len(), 2);
    assert_eq!(shape.properties[0].type_id, info.type_params[0]);
    assert!(shape.properties[1].optional);
}

#[test]
fn test_load_recursive_alias_and_forward_reference() {
    let doc = TypeDocument::from_json(
        r#"{
            "declarations": {
                "Tree": { "kind": "alias", "type": { "shape": { "properties": [
                    { "name": "leaf", "type": { "ref": { "name": "Leaf" } } },
                    { "name": "children", "type": { "array": { "ref": { "name": "Tree" } } } }
                ] } } },
                "Leaf": { "kind": "alias", "type": { "union": [{ "literal": "a" }, { "literal": 2 }, { "literal": true }] } }
            }
        }"#,
    )
    .unwrap();

    let mut graph = TypeGraph::new();
    let loaded = doc.load(&mut graph).unwrap();
    assert!(loaded.def("Tree").is_some());
    let leaf = graph.definition(loaded.def("Leaf").unwrap()).unwrap();
    assert!(matches!(graph.lookup(leaf.body.unwrap()), Some(TypeData::Union(_))));
}

#[test]
fn test_load_tuple_template_and_access() {
    let doc = TypeDocument::from_json(
        r#"{
            "declarations": {
                "Pair": { "kind": "alias", "type": { "tuple": ["number", { "type": "string", "optional": true }] } },
                "Id": { "kind": "alias", "type": { "template": [{ "text": "id-" }, { "type": "number" }] } },
                "First": { "kind": "alias", "type": { "index": { "object": { "ref": { "name": "Pair" } }, "index": { "literal": 0 } } } }
            }
        }"#,
    )
    .unwrap();

    let mut graph = TypeGraph::new();
    let loaded = doc.load(&mut graph).unwrap();
    let pair = graph.definition(loaded.def("Pair").unwrap()).unwrap();
    let Some(TypeData::Tuple(list)) = graph.lookup(pair.body.unwrap()).cloned() else {
        panic!("expected tuple");
    };
    assert!(graph.tuple_list(list)[1].optional);
    let id = graph.definition(loaded.def("Id").unwrap()).unwrap();
    assert!(matches!(graph.lookup(id.body.unwrap()), Some(TypeData::TemplateLiteral(_))));
}

#[test]
fn test_unknown_names_are_errors() {
    let doc = TypeDocument::from_json(
        r#"{ "declarations": { "A": { "kind": "alias", "type": { "ref": { "name": "Missing" } } } } }"#,
    )
    .unwrap();
    let mut graph = TypeGraph::new();
    assert!(matches!(
        doc.load(&mut graph),
        Err(DocumentError::UnknownName { name }) if name == "Missing"
    ));

    let doc = TypeDocument::from_json(
        r#"{ "declarations": { "A": { "kind": "alias", "type": { "param": "T" } } } }"#,
    )
    .unwrap();
    let mut graph = TypeGraph::new();
    assert!(matches!(
        doc.load(&mut graph),
        Err(DocumentError::UnknownParameter { .. })
    ));
}

#[test]
fn test_too_many_type_arguments() {
    let doc = TypeDocument::from_json(
        r#"{ "declarations": {
            "A": { "kind": "alias", "type": "string" },
            "B": { "kind": "alias", "type": { "ref": { "name": "A", "args": ["number"] } } }
        } }"#,
    )
    .unwrap();
    let mut graph = TypeGraph::new();
    assert!(matches!(
        doc.load(&mut graph),
        Err(DocumentError::ArgumentCount { expected: 0, actual: 1, .. })
    ));
}

#[test]
fn test_lower_standalone_expression() {
    let mut graph = TypeGraph::new();
    let expr: TypeExpr = serde_json::from_str(r#"{ "array": "date" }"#).unwrap();
    let id = TypeDocument::lower_expr(&mut graph, &expr).unwrap();
    assert_eq!(graph.lookup(id), Some(&TypeData::Array(TypeId::DATE)));
}
