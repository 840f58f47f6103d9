//! XTYTX envelopes through the facade

use super::*;

fn point(x: Value, y: Value) -> Value {
    obj(vec![("x", x), ("y", y)])
}

#[test]
fn test_local_struct_wins_during_call() {
    let tytx = create_tytx();
    let envelope = Envelope::new(json!({"p": r#"["1.5","2.5","3"]::@POINT"#}))
        .with_global_struct("POINT", json!("x:L,y:L"))
        .with_local_struct("POINT", json!("x:R,y:R,z:R"));
    let text = tytx.encode_envelope(&envelope).unwrap();
    assert!(text.starts_with("XTYTX://"));

    let value = tytx.from_json(&text).unwrap();
    assert_eq!(
        value.get("p"),
        Some(&obj(vec![
            ("x", Value::Float(1.5)),
            ("y", Value::Float(2.5)),
            ("z", Value::Float(3.0)),
        ]))
    );

    // the global definition persists, the local one is gone
    assert_eq!(tytx.get_struct("POINT").unwrap().to_json(), json!("x:L,y:L"));
    assert_eq!(
        tytx.decode(r#"["1","2"]::@POINT"#).unwrap(),
        point(Value::Int(1), Value::Int(2))
    );
}

#[test]
fn test_suffixed_messages() {
    let tytx = create_tytx();
    tytx.register_struct("POINT", &json!("x:R,y:R")).unwrap();
    assert_eq!(
        tytx.from_json(r#"["1.5","2"]::@POINT"#).unwrap(),
        point(Value::Float(1.5), Value::Float(2.0))
    );
    assert_eq!(
        tytx.from_json("[1,2,3]::#L").unwrap(),
        Value::Array(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );

    let envelope = Envelope::new(r#"["3","4"]::@POINT"#)
        .with_local_struct("POINT", json!("x:L,y:L"));
    let text = tytx.encode_envelope(&envelope).unwrap();
    assert_eq!(
        tytx.from_json(&text).unwrap(),
        point(Value::Int(3), Value::Int(4))
    );
}

#[test]
fn test_struct_only_envelope() {
    let tytx = create_tytx();
    let text = r#"XTYTX://{"gstruct": {"ROW": ["T", "N"]}, "lstruct": {}, "data": ""}"#;

    let outcome = tytx.process_envelope(text).unwrap();
    assert_eq!(outcome.data, None);
    assert_eq!(outcome.registered_structs, vec!["ROW".to_string()]);
    assert_eq!(tytx.from_json(text).unwrap(), Value::Null);
    assert!(tytx.is_typed("x::@ROW"));
}

#[test]
fn test_schemas_registered_and_reported() {
    let tytx = create_tytx();
    let text = r#"XTYTX://{
        "gstruct": {},
        "lstruct": {},
        "gschema": {"order": {"type": "object"}},
        "lschema": {"tmp": {"type": "array"}},
        "data": "TYTX://[\"1::L\"]"
    }"#;

    let outcome = tytx.process_envelope(text).unwrap();
    assert_eq!(outcome.data, Some(Value::Array(vec![Value::Int(1)])));
    assert_eq!(outcome.registered_schemas, vec!["order".to_string()]);
    assert_eq!(outcome.local_schemas["tmp"], json!({"type": "array"}));
    assert_eq!(tytx.get_schema("order"), Some(json!({"type": "object"})));
    assert_eq!(tytx.get_schema("tmp"), None);
}

#[test]
fn test_malformed_envelopes() {
    let tytx = create_tytx();
    for text in [
        "XTYTX://not json",
        r#"XTYTX://{"lstruct": {}, "data": ""}"#,
        r#"XTYTX://{"gstruct": {}, "lstruct": {}}"#,
        r#"XTYTX://{"gstruct": {"BAD": 7}, "lstruct": {}, "data": ""}"#,
    ] {
        let err = tytx.from_json(text).unwrap_err();
        assert!(matches!(err, Error::InvalidEnvelope(_)), "{text}: {err:?}");
        assert!(err.is_malformed_input());
    }
}

#[test]
fn test_failed_globals_leave_registry_untouched() {
    let tytx = create_tytx();
    let text = r#"XTYTX://{"gstruct": {"GOOD": ["L"], "BAD": 7}, "lstruct": {}, "data": ""}"#;
    assert!(tytx.process_envelope(text).is_err());
    assert!(tytx.get_struct("GOOD").is_none());
}

#[test]
fn test_envelope_on_clone_is_visible_to_original() {
    let tytx = create_tytx();
    let clone = tytx.clone();
    clone
        .from_json(r#"XTYTX://{"gstruct": {"P": "x:L"}, "lstruct": {}, "data": null}"#)
        .unwrap();
    assert_eq!(
        tytx.decode(r#"["7"]::@P"#).unwrap(),
        obj(vec![("x", Value::Int(7))])
    );
}
