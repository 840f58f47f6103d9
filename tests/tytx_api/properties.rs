//! Property-based round trips

use super::*;
use proptest::prelude::*;

fn arb_decimal() -> impl Strategy<Value = Value> {
    (any::<i64>(), 0u32..10).prop_map(|(m, scale)| Value::Decimal(Decimal::new(m, scale)))
}

fn arb_date() -> impl Strategy<Value = Value> {
    (1000i32..9999, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
}

fn arb_datetime() -> impl Strategy<Value = Value> {
    (0i64..4_000_000_000_000).prop_map(|ms| {
        Value::DateTime(chrono::DateTime::from_timestamp_millis(ms).unwrap())
    })
}

fn arb_time() -> impl Strategy<Value = Value> {
    (0u32..86_400, 0u32..1000).prop_map(|(secs, ms)| {
        Value::Time(NaiveTime::from_num_seconds_from_midnight_opt(secs, ms * 1_000_000).unwrap())
    })
}

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1e12f64..1e12).prop_map(Value::Float),
        arb_decimal(),
        arb_date(),
        arb_datetime(),
        arb_time(),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ]
}

/// Leaves for container trees; floats stay exactly representable in JSON text
fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1_000_000i64..1_000_000).prop_map(|n| Value::Float(n as f64 / 4.0)),
        arb_decimal(),
        arb_date(),
        arb_datetime(),
        arb_time(),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ]
}

fn arb_tree() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Every built-in scalar survives encode then decode.
    #[test]
    fn prop_scalar_round_trip(value in arb_scalar()) {
        let tytx = Tytx::new();
        let text = tytx.encode_typed(&value).unwrap();
        prop_assert_eq!(tytx.decode(&text).unwrap(), value);
    }

    /// Typed JSON preserves nested trees.
    #[test]
    fn prop_json_round_trip(value in arb_tree()) {
        let tytx = Tytx::new();
        let text = tytx.to_typed_json(&value).unwrap();
        prop_assert_eq!(tytx.from_json(&text).unwrap(), value);
    }

    /// MessagePack preserves nested trees in both modes.
    #[test]
    fn prop_msgpack_round_trip(value in arb_tree(), hybrid in any::<bool>()) {
        let tytx = Tytx::builder().msgpack_hybrid(hybrid).build().unwrap();
        let bytes = tytx.to_msgpack(&value).unwrap();
        prop_assert_eq!(tytx.from_msgpack(&bytes).unwrap(), value);
    }

    /// Strings without a separator always decode to themselves.
    #[test]
    fn prop_plain_strings_unchanged(s in "[^:]{0,32}") {
        let tytx = Tytx::new();
        prop_assert_eq!(tytx.decode(&s).unwrap(), Value::String(s.clone()));
        prop_assert!(!tytx.is_typed(&s));
    }
}
