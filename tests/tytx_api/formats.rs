//! JSON, XML and MessagePack adapters through the facade

use super::*;

fn order() -> Value {
    obj(vec![
        ("id", Value::Int(42)),
        ("total", dec("199.99")),
        ("placed", Value::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())),
        ("lines", Value::Array(vec![dec("1.5"), Value::String("note".into())])),
    ])
}

// =============================================================================
// JSON
// =============================================================================

mod json_tests {
    use super::*;

    #[test]
    fn test_typed_json_round_trip() {
        let tytx = create_tytx();
        let text = tytx.to_typed_json(&order()).unwrap();
        assert_eq!(
            text,
            r#"{"id":42,"total":"199.99::N","placed":"2025-01-15::D","lines":["1.5::N","note"]}::TYTX"#
        );
        assert_eq!(tytx.from_json(&text).unwrap(), order());
    }

    #[test]
    fn test_no_marker_without_typed_leaves() {
        let tytx = create_tytx();
        let value = obj(vec![("a", Value::Int(1)), ("b", Value::String("x".into()))]);
        assert_eq!(tytx.to_typed_json(&value).unwrap(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_marker_options() {
        init_tracing();
        let value = Value::Array(vec![dec("1")]);
        let cases = [
            (PayloadMarker::None, r#"["1::N"]"#),
            (PayloadMarker::Js, r#"["1::N"]::JS"#),
            (PayloadMarker::Tytx, r#"["1::N"]::TYTX"#),
            (PayloadMarker::Protocol, r#"TYTX://["1::N"]"#),
        ];
        for (marker, expected) in cases {
            let tytx = Tytx::builder().marker(marker).build().unwrap();
            let text = tytx.to_typed_json(&value).unwrap();
            assert_eq!(text, expected);
            assert_eq!(tytx.from_json(&text).unwrap(), value);
        }
    }

    #[test]
    fn test_plain_json_is_lossy() {
        let tytx = create_tytx();
        let text = tytx.to_json(&order()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!((parsed["total"].as_f64().unwrap() - 199.99).abs() < 1e-9);
        assert_eq!(parsed["placed"], json!("2025-01-15"));
    }

    #[test]
    fn test_malformed_json() {
        let tytx = create_tytx();
        let err = tytx.from_json("{not json}::TYTX").unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }
}

// =============================================================================
// XML
// =============================================================================

mod xml_tests {
    use super::*;

    fn order_doc() -> Value {
        obj(vec![(
            "order",
            obj(vec![
                ("attrs", obj(vec![("id", Value::Int(42))])),
                (
                    "value",
                    obj(vec![(
                        "total",
                        obj(vec![("attrs", obj(vec![])), ("value", dec("199.99"))]),
                    )]),
                ),
            ]),
        )])
    }

    #[test]
    fn test_round_trip_keeps_types() {
        let tytx = create_tytx();
        let text = tytx.to_xml_value(&order_doc()).unwrap();
        assert_eq!(text, r#"<order id="42::L"><total>199.99::N</total></order>"#);

        let doc = tytx.from_xml(&text).unwrap();
        let node = &doc["order"].nodes()[0];
        assert_eq!(node.attrs["id"], Value::Int(42));
        assert_eq!(obj(vec![("order", node.to_value())]), order_doc());
    }

    #[test]
    fn test_empty_element_is_self_closing() {
        let tytx = create_tytx();
        let mut doc = XmlDocument::new();
        doc.insert("empty".into(), XmlChild::One(XmlNode::new(XmlContent::Null)));
        let text = tytx.to_xml(&doc).unwrap();
        assert_eq!(text, "<empty/>");
        assert_eq!(tytx.from_xml(&text).unwrap(), doc);
    }

    #[test]
    fn test_multiple_roots() {
        let tytx = create_tytx();
        let mut doc = XmlDocument::new();
        doc.insert("a".into(), XmlChild::One(XmlNode::scalar(Value::Int(1))));
        doc.insert("b".into(), XmlChild::One(XmlNode::scalar(Value::Int(2))));
        assert_eq!(tytx.to_xml(&doc).unwrap_err(), Error::MultipleRoots { count: 2 });

        let wrapped = Tytx::builder().xml_root_tag("root").build().unwrap();
        assert_eq!(
            wrapped.to_xml(&doc).unwrap(),
            "<root><a>1::L</a><b>2::L</b></root>"
        );
    }

    #[test]
    fn test_invalid_content() {
        let tytx = create_tytx();
        let bad = obj(vec![(
            "a",
            obj(vec![("attrs", obj(vec![])), ("value", Value::Array(vec![]))]),
        )]);
        assert!(matches!(
            tytx.to_xml_value(&bad).unwrap_err(),
            Error::InvalidXmlContent(_)
        ));

        let not_a_node = obj(vec![("a", Value::Int(1))]);
        assert!(matches!(
            tytx.to_xml_value(&not_a_node).unwrap_err(),
            Error::InvalidXmlContent(_)
        ));
    }

    #[test]
    fn test_malformed_xml() {
        let tytx = create_tytx();
        assert!(tytx.from_xml("<a><b></a>").unwrap_err().is_malformed_input());
    }
}

// =============================================================================
// MessagePack
// =============================================================================

mod msgpack_tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tytx = create_tytx();
        let bytes = tytx.to_msgpack(&order()).unwrap();
        assert_eq!(tytx.from_msgpack(&bytes).unwrap(), order());
    }

    #[test]
    fn test_hybrid_and_wrapped_decode_alike() {
        init_tracing();
        let plain = obj(vec![("a", Value::Int(1)), ("b", Value::Float(0.5))]);
        let hybrid = Tytx::new();
        let wrapped = Tytx::builder().msgpack_hybrid(false).build().unwrap();

        let hybrid_bytes = hybrid.to_msgpack(&plain).unwrap();
        let wrapped_bytes = wrapped.to_msgpack(&plain).unwrap();
        assert_ne!(hybrid_bytes, wrapped_bytes);
        assert_eq!(hybrid.from_msgpack(&wrapped_bytes).unwrap(), plain);
        assert_eq!(wrapped.from_msgpack(&hybrid_bytes).unwrap(), plain);
    }

    #[test]
    fn test_truncated_input() {
        let tytx = create_tytx();
        let bytes = tytx.to_msgpack(&order()).unwrap();
        let err = tytx.from_msgpack(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(err.is_malformed_input());
    }
}
