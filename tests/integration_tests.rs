// tests/integration_tests.rs

use std::sync::Arc;

use mql::{
    clear_superset_cache, compile, make_superset_projector, make_superset_projector_memoized,
    matches, project, sample, Value,
};
use serde_json::json;

fn doc(value: serde_json::Value) -> Value {
    Value::from(value)
}

// ============================================================================
// End-to-end pipeline
// ============================================================================

#[test]
fn test_compile_once_evaluate_many() {
    let q = compile(
        "subscription-1",
        "select e['req']['url'], resp from stream where e['nqOrg'] == 'iosui'",
    )
    .unwrap();

    let keep = doc(json!({"req": {"url": "u"}, "resp": "r", "nqOrg": "iosui", "noise": 1}));
    let drop = doc(json!({"req": {"url": "u"}, "resp": "r", "nqOrg": "other"}));

    assert!(matches(&q, &keep));
    assert!(!matches(&q, &drop));
    assert_eq!(
        project(&q, &keep),
        doc(json!({"req": {"url": "u"}, "resp": "r", "nqOrg": "iosui"}))
    );
    // No sample clause: every matched record is kept
    assert!(sample(&q, &keep));
}

// ============================================================================
// Superset projection
// ============================================================================

#[test]
fn test_superset_projection_unions_query_needs() {
    let q1 = compile("s1", "select a from stream where b == 15").unwrap();
    let q2 = compile("s2", "select d from stream where e['z']['y'] == 10").unwrap();
    let projector = make_superset_projector(&[q1, q2]);

    let datum = doc(json!({"a": 1, "b": 1, "c": 1, "d": 1, "x": 1, "y": 1, "z": {"y": 10}}));
    assert_eq!(
        projector.project(&datum),
        doc(json!({"a": 1, "b": 1, "d": 1, "z": {"y": 10}}))
    );
}

#[test]
fn test_superset_projection_with_prefix_and_star_queries() {
    let texts = [
        "select version, e[^'result'] from stream",
        "select e['version'] from stream where e['errors'][*]['code'] == 'err123'",
        "select e['errors'][0]['code'] from stream",
    ];
    let projector =
        make_superset_projector_memoized(&texts).expect("queries compile");

    let datum = doc(json!({
        "version": "1.0.1",
        "timestamp": "12345678910111213",
        "result_a": "SUCCESS",
        "result_b": "SUCCESS",
        "result_c": "FAILURE",
        "errors": {
            "err1": {"code": "err123"},
            "err2": {"code": "err456"}
        }
    }));

    let projected = projector.project(&datum);
    let expected = doc(json!({
        "version": "1.0.1",
        "result_a": "SUCCESS",
        "result_b": "SUCCESS",
        "result_c": "FAILURE",
        "errors": {
            "err1": {"code": "err123"},
            "err2": {"code": "err456"}
        }
    }));
    assert_eq!(projected, expected);
}

#[test]
fn test_superset_of_select_star_keeps_everything() {
    let q1 = compile("s1", "select * from stream").unwrap();
    let q2 = compile("s2", "select a from stream").unwrap();
    let projector = make_superset_projector(&[q1, q2]);

    let datum = doc(json!({"a": 1, "b": 2}));
    assert_eq!(projector.project(&datum), datum);
}

#[test]
fn test_memoization_lifecycle() {
    let ssq1 = "select a1 from stream where b1 == 15";
    let ssq2 = "select d1 from stream where e['z1']['y1'] == 10";

    // Repeated calls with the same set reuse the built projector
    let first = make_superset_projector_memoized(&[ssq1, ssq2]).unwrap();
    let second = make_superset_projector_memoized(&[ssq1, ssq2]).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // The cache key is order-insensitive
    let reordered = make_superset_projector_memoized(&[ssq2, ssq1]).unwrap();
    assert!(Arc::ptr_eq(&first, &reordered));

    // The cached projector behaves identically to a freshly built one
    let fresh = make_superset_projector(&[
        compile("f1", ssq1).unwrap(),
        compile("f2", ssq2).unwrap(),
    ]);
    let datum = doc(json!({"a1": 1, "b1": 2, "d1": 3, "z1": {"y1": 10}, "junk": 0}));
    assert_eq!(first.project(&datum), fresh.project(&datum));

    // Clearing drops the entry; the next request builds a new projector
    clear_superset_cache();
    let rebuilt = make_superset_projector_memoized(&[ssq1, ssq2]).unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(first.project(&datum), rebuilt.project(&datum));
}

#[test]
fn test_memoized_projector_surfaces_syntax_errors() {
    let err = make_superset_projector_memoized(&["select from nothing"]).unwrap_err();
    assert!(!err.message.is_empty());
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn test_random_sampling_threshold_bounds() {
    let never = compile(
        "t",
        r#"select * from stream sample {"strategy": "RANDOM", "threshold": 0}"#,
    )
    .unwrap();
    let always = compile(
        "t",
        r#"select * from stream sample {"strategy": "RANDOM", "threshold": 1000}"#,
    )
    .unwrap();

    let datum = doc(json!({"a": 1}));
    for _ in 0..100 {
        assert!(!sample(&never, &datum));
        assert!(sample(&always, &datum));
    }
}

#[test]
fn test_sticky_sampling_is_deterministic_per_key_value() {
    let q = compile(
        "t",
        r#"select * from stream sample {"strategy": "STICKY", "keys": ["esn"], "threshold": 500}"#,
    )
    .unwrap();

    // Same esn, different payloads: the decision must be identical
    let first = sample(&q, &doc(json!({"esn": "NFANDROID-001", "latency": 1})));
    for i in 0..50 {
        let datum = doc(json!({"esn": "NFANDROID-001", "latency": i}));
        assert_eq!(sample(&q, &datum), first);
    }
}

#[test]
fn test_sticky_sampling_threshold_bounds() {
    let never = compile(
        "t",
        r#"select * from stream sample {"strategy": "STICKY", "keys": ["esn"], "threshold": 0}"#,
    )
    .unwrap();
    let always = compile(
        "t",
        r#"select * from stream sample {"strategy": "STICKY", "keys": ["esn"], "threshold": 1000}"#,
    )
    .unwrap();

    for i in 0..20 {
        let datum = doc(json!({"esn": format!("device-{}", i)}));
        assert!(!sample(&never, &datum));
        assert!(sample(&always, &datum));
    }
}

#[test]
fn test_sticky_sampling_with_absent_key_is_stable() {
    let q = compile(
        "t",
        r#"select * from stream sample {"strategy": "STICKY", "keys": ["esn"], "threshold": 500}"#,
    )
    .unwrap();

    // Documents missing the key all bucket together via the placeholder
    let first = sample(&q, &doc(json!({"other": 1})));
    assert_eq!(sample(&q, &doc(json!({}))), first);
    assert_eq!(sample(&q, &doc(json!({"other": 2}))), first);
}

#[test]
fn test_sticky_sampling_with_multiple_keys() {
    let q = compile(
        "t",
        r#"select * from stream sample {"strategy": "STICKY", "keys": ["device", "session"], "threshold": 500}"#,
    )
    .unwrap();

    let first = sample(&q, &doc(json!({"device": "d1", "session": "s1"})));
    assert_eq!(
        sample(&q, &doc(json!({"device": "d1", "session": "s1", "noise": true}))),
        first
    );
}

// ============================================================================
// CLI pipeline
// ============================================================================

#[cfg(feature = "cli")]
#[test]
fn test_cli_run_filters_and_projects() {
    use mql::cli::{execute_run, RunOptions};

    let options = RunOptions {
        query: "select resp from stream where a == 1".to_string(),
        input: "{\"a\": 1, \"resp\": \"keep\"}\n{\"a\": 2, \"resp\": \"drop\"}\n".to_string(),
        pretty: false,
    };

    let mut out = Vec::new();
    execute_run(&options, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "{\"resp\":\"keep\"}\n");
}

#[cfg(feature = "cli")]
#[test]
fn test_cli_run_rejects_bad_query() {
    use mql::cli::{execute_run, CliError, RunOptions};

    let options = RunOptions {
        query: "select from".to_string(),
        input: String::new(),
        pretty: false,
    };

    let mut out = Vec::new();
    match execute_run(&options, &mut out) {
        Err(CliError::Syntax(e)) => assert!(!e.message.is_empty()),
        other => panic!("expected syntax error, got {:?}", other.map(|_| ())),
    }
}
