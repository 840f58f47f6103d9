//! Struct registration and resolution

use super::*;

fn data(json: serde_json::Value) -> Value {
    Value::from_json(json)
}

// =============================================================================
// Shapes
// =============================================================================

#[test]
fn test_field_map() {
    let tytx = create_tytx();
    tytx.register_struct("CUSTOMER", &json!({"name": "T", "balance": "N"}))
        .unwrap();

    let out = tytx
        .resolve(data(json!({"name": "Acme", "balance": "100", "x": "y"})), "CUSTOMER")
        .unwrap();
    assert_eq!(
        out,
        obj(vec![
            ("name", Value::String("Acme".into())),
            ("balance", dec("100")),
            ("x", Value::String("y".into())),
        ])
    );
}

#[test]
fn test_field_map_does_not_synthesize_missing_keys() {
    let tytx = create_tytx();
    tytx.register_struct("CUSTOMER", &json!({"name": "T", "balance": "N"}))
        .unwrap();
    let out = tytx.resolve(data(json!({"name": "Acme"})), "CUSTOMER").unwrap();
    assert_eq!(out, obj(vec![("name", Value::String("Acme".into()))]));
}

#[test]
fn test_positional_list() {
    let tytx = create_tytx();
    tytx.register_struct("ROW", &json!(["T", "L", "N"])).unwrap();

    let out = tytx.resolve(data(json!(["Product", 2, "100.50"])), "ROW").unwrap();
    assert_eq!(
        out,
        Value::Array(vec![Value::String("Product".into()), Value::Int(2), dec("100.50")])
    );

    let err = tytx.resolve(data(json!(["Product", 2])), "ROW").unwrap_err();
    assert!(matches!(err, Error::SchemaMismatch(_)));
}

#[test]
fn test_homogeneous_list() {
    let tytx = create_tytx();
    tytx.register_struct("PRICES", &json!(["N"])).unwrap();

    let out = tytx.resolve(data(json!([100, 200, 50])), "PRICES").unwrap();
    assert_eq!(out, Value::Array(vec![dec("100"), dec("200"), dec("50")]));
    assert_eq!(
        tytx.resolve(data(json!([])), "PRICES").unwrap(),
        Value::Array(vec![])
    );
}

#[test]
fn test_ordered_fields() {
    let tytx = create_tytx();
    tytx.register_struct("POINT", &json!("x:R,y:R")).unwrap();
    tytx.register_struct("PAIR", &json!("R,R")).unwrap();

    let raw = data(json!(["3.7", "7.3"]));
    assert_eq!(
        tytx.resolve(raw.clone(), "POINT").unwrap(),
        obj(vec![("x", Value::Float(3.7)), ("y", Value::Float(7.3))])
    );
    assert_eq!(
        tytx.resolve(raw, "PAIR").unwrap(),
        Value::Array(vec![Value::Float(3.7), Value::Float(7.3)])
    );
}

#[test]
fn test_ordered_fields_batch() {
    let tytx = create_tytx();
    tytx.register_struct("POINT", &json!("x:L,y:L")).unwrap();
    let out = tytx.decode(r#"[["1","2"],["3","4"]]::@POINT"#).unwrap();
    assert_eq!(
        out,
        Value::Array(vec![
            obj(vec![("x", Value::Int(1)), ("y", Value::Int(2))]),
            obj(vec![("x", Value::Int(3)), ("y", Value::Int(4))]),
        ])
    );
}

#[test]
fn test_nested_struct_reference() {
    let tytx = create_tytx();
    tytx.register_struct("ADDRESS", &json!({"zip": "L"})).unwrap();
    tytx.register_struct("CUSTOMER", &json!({"name": "T", "address": "@ADDRESS"}))
        .unwrap();

    let out = tytx
        .resolve(data(json!({"name": "Acme", "address": {"zip": "12345"}})), "CUSTOMER")
        .unwrap();
    assert_eq!(out.get("address"), Some(&obj(vec![("zip", Value::Int(12345))])));
}

#[test]
fn test_unregistered_struct_passes_through() {
    let tytx = create_tytx();
    assert_eq!(
        tytx.decode(r#"["1"]::@NOPE"#).unwrap(),
        Value::String(r#"["1"]::@NOPE"#.into())
    );
    let raw = data(json!({"a": "1"}));
    assert_eq!(tytx.resolve(raw.clone(), "NOPE").unwrap(), raw);
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_metadata_is_kept() {
    let tytx = create_tytx();
    tytx.register_struct("FORM", &json!("name:T[min:1, max:50, label:'Name'],age:L"))
        .unwrap();
    let schema = tytx.get_struct("FORM").unwrap();
    let round = StructSchema::from_json("FORM", &schema.to_json()).unwrap();
    assert_eq!(round, schema);
}

#[test]
fn test_invalid_shapes_rejected() {
    let tytx = create_tytx();
    for shape in [json!(42), json!([]), json!("x:R,R")] {
        let err = tytx.register_struct("BAD", &shape).unwrap_err();
        assert!(err.is_schema_error(), "{shape} gave {err:?}");
    }
    assert!(tytx.list_structs().is_empty());
}

#[test]
fn test_list_structs_in_registration_order() {
    let tytx = create_tytx();
    tytx.register_struct("B", &json!(["L"])).unwrap();
    tytx.register_struct("A", &json!(["N"])).unwrap();
    assert_eq!(tytx.list_structs(), vec!["B".to_string(), "A".to_string()]);
}
