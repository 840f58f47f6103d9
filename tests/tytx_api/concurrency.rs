//! Shared instances across threads

use super::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_decode_while_registering() {
    let tytx = create_tytx();
    tytx.register_struct("ROW", &json!(["T", "N"])).unwrap();

    let barrier = Arc::new(Barrier::new(5));
    let mut handles = Vec::new();

    for _ in 0..4 {
        let tytx = tytx.clone();
        let barrier = Arc::clone(&barrier);
        handles.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..200 {
                let value = tytx.decode(r#"["a","1.5"]::@ROW"#).unwrap();
                assert_eq!(
                    value,
                    Value::Array(vec![Value::String("a".into()), dec("1.5")])
                );
            }
        }));
    }

    let writer = tytx.clone();
    let barrier_w = Arc::clone(&barrier);
    handles.push(thread::spawn(move || {
        barrier_w.wait();
        for i in 0..200 {
            writer
                .register_struct(&format!("EXTRA{}", i), &json!(["L"]))
                .unwrap();
        }
    }));

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(tytx.list_structs().len(), 201);
}

#[test]
fn test_concurrent_envelopes_keep_local_precedence() {
    let tytx = create_tytx();
    let mut handles = Vec::new();

    for i in 0..8i64 {
        let tytx = tytx.clone();
        handles.push(thread::spawn(move || {
            let text = format!(
                r#"XTYTX://{{"gstruct": {{"P": "x:L"}}, "lstruct": {{"P": "x:R,y:R"}}, "data": {{"p": "[\"{i}\",\"{i}\"]::@P"}}}}"#
            );
            let value = tytx.from_json(&text).unwrap();
            assert_eq!(
                value.get("p"),
                Some(&obj(vec![
                    ("x", Value::Float(i as f64)),
                    ("y", Value::Float(i as f64)),
                ]))
            );
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(tytx.get_struct("P").unwrap().to_json(), json!("x:L"));
}

#[test]
fn test_global_instance_shared_across_threads() {
    init_tracing();
    let handles: Vec<_> = (0..4)
        .map(|_| thread::spawn(|| tytx::global().decode("2025-01-15::D").unwrap()))
        .collect();
    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            Value::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
        );
    }
}
