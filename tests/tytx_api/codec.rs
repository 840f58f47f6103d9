//! Scalar codec through the facade

use super::*;

// =============================================================================
// Decode
// =============================================================================

#[test]
fn test_plain_and_unknown_pass_through() {
    let tytx = create_tytx();
    assert_eq!(tytx.decode("hello").unwrap(), Value::String("hello".into()));
    assert_eq!(
        tytx.decode("hello::BOGUS").unwrap(),
        Value::String("hello::BOGUS".into())
    );
}

#[test]
fn test_decode_detailed_distinguishes_pass_through() {
    let tytx = create_tytx();
    assert!(tytx.decode_detailed("1::L").unwrap().is_resolved());
    let decoded = tytx.decode_detailed("1::NOPE").unwrap();
    assert!(!decoded.is_resolved());
    assert_eq!(decoded.into_value(), Value::String("1::NOPE".into()));
}

#[test]
fn test_datetime_alias() {
    let tytx = create_tytx();
    let expected = Value::DateTime(Utc.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap());
    assert_eq!(tytx.decode("2025-01-15T10:00:00Z::DH").unwrap(), expected);
    assert_eq!(tytx.decode("2025-01-15T10:00:00Z::DHZ").unwrap(), expected);
}

// =============================================================================
// Encode
// =============================================================================

#[test]
fn test_encode_builtins() {
    let tytx = create_tytx();
    let expected = [
        "100.50::N",
        "2025-01-15::D",
        "2025-01-15T10:30:00Z::DHZ",
        "10:30:00::H",
    ];
    for ((_, value), text) in typed_values().iter().zip(expected) {
        assert_eq!(tytx.encode(value).unwrap(), text);
    }
}

#[test]
fn test_json_native_values_bare_unless_forced() {
    let tytx = create_tytx();
    assert_eq!(tytx.encode(&Value::Bool(true)).unwrap(), "true");
    assert_eq!(tytx.encode(&Value::Int(0)).unwrap(), "0");
    assert_eq!(tytx.encode_typed(&Value::Bool(false)).unwrap(), "false::B");
    assert_eq!(tytx.encode_typed(&Value::Int(0)).unwrap(), "0::L");
    assert_eq!(tytx.encode_typed(&Value::Float(2.5)).unwrap(), "2.5::R");
}

#[test]
fn test_strings_never_suffixed() {
    let tytx = create_tytx();
    let value = Value::String("plain".into());
    assert_eq!(tytx.encode(&value).unwrap(), "plain");
    assert_eq!(tytx.encode_typed(&value).unwrap(), "plain");
}

#[test]
fn test_compact_array_round_trip() {
    let tytx = create_tytx();
    let values = vec![Value::Int(1), Value::Int(2), Value::Int(3)];
    let text = tytx.encode_array(&values, Some("L")).unwrap().unwrap();
    assert_eq!(text, "[1,2,3]::#L");
    assert_eq!(tytx.decode(&text).unwrap(), Value::Array(values));
}

#[test]
fn test_compact_arrays_option() {
    init_tracing();
    let tytx = Tytx::builder().compact_arrays(true).build().unwrap();
    let value = Value::Array(vec![dec("1"), dec("2.5")]);
    let text = tytx.encode(&value).unwrap();
    assert_eq!(text, r#"["1","2.5"]::#N"#);
    assert_eq!(tytx.decode(&text).unwrap(), value);
}

#[test]
fn test_unregistered_tagged_value_fails() {
    let tytx = create_tytx();
    let value = Value::Tagged(TaggedValue::new("Money", Value::Int(5)));
    let err = tytx.encode(&value).unwrap_err();
    assert!(matches!(err, Error::NonSerializableValue(_)));
    assert!(err.is_encode_error());
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_custom_class_round_trip() {
    let tytx = create_tytx();
    tytx.register_class(
        "UUID",
        "Uuid",
        |v| match v {
            Value::Tagged(t) => Ok(t.data.as_str().unwrap_or_default().to_string()),
            _ => Ok(String::new()),
        },
        |raw| Ok(Value::Tagged(TaggedValue::new("Uuid", Value::String(raw.into())))),
    )
    .unwrap();

    let value = Value::Tagged(TaggedValue::new("Uuid", Value::String("abc-1".into())));
    let text = tytx.encode(&value).unwrap();
    assert_eq!(text, "abc-1::~UUID");
    assert_eq!(tytx.decode(&text).unwrap(), value);
    assert!(tytx.is_typed(&text));

    assert!(tytx.unregister_class("UUID"));
    assert_eq!(tytx.decode(&text).unwrap(), Value::String(text.clone()));
}

#[test]
fn test_is_typed() {
    let tytx = create_tytx();
    assert!(tytx.is_typed("123::L"));
    assert!(!tytx.is_typed("123"));
    assert!(!tytx.is_typed("123::BOGUS"));

    assert!(!tytx.is_typed("data::@ROW"));
    tytx.register_struct("ROW", &json!(["T", "N"])).unwrap();
    assert!(tytx.is_typed("data::@ROW"));
    assert!(tytx.is_typed("data::#@ROW"));
    tytx.unregister_struct("ROW");
    assert!(!tytx.is_typed("data::@ROW"));
}

#[test]
fn test_empty_registry_passes_everything_through() {
    init_tracing();
    let tytx = Tytx::builder().empty_registry().build().unwrap();
    assert_eq!(tytx.decode("42::L").unwrap(), Value::String("42::L".into()));
    assert!(!tytx.is_typed("42::L"));
}
