// tests/projection_tests.rs

use mql::{compile, project, Query, Value};
use serde_json::json;

fn query(text: &str) -> Query {
    compile("test", text).unwrap()
}

fn doc(value: serde_json::Value) -> Value {
    Value::from(value)
}

// ============================================================================
// Select projection
// ============================================================================

#[test]
fn test_basic_projection() {
    let q = query("select e['req'], resp from stream");
    let datum = doc(json!({
        "req": {"url": "http://www.netflix.com"},
        "resp": "movies!",
        "referrer": "none"
    }));
    assert_eq!(
        project(&q, &datum),
        doc(json!({"req": {"url": "http://www.netflix.com"}, "resp": "movies!"}))
    );
}

#[test]
fn test_nested_projection_trims_siblings() {
    let q = query("select e['req']['url'], resp from stream");
    let datum = doc(json!({
        "req": {"url": "http://www.netflix.com", "method": "get"},
        "resp": "movies!",
        "referrer": "none"
    }));
    assert_eq!(
        project(&q, &datum),
        doc(json!({"req": {"url": "http://www.netflix.com"}, "resp": "movies!"}))
    );
}

#[test]
fn test_index_projection_keeps_index_as_mapping_key() {
    let q = query("select e['commands'][1] from stream");
    let datum = doc(json!({"commands": ["a", "b", "c"]}));
    assert_eq!(project(&q, &datum), doc(json!({"commands": {"1": "b"}})));
}

#[test]
fn test_select_star_is_identity_over_top_level() {
    let q = query("select * from stream");
    let datum = doc(json!({"a": 1, "b": {"c": 2}}));
    assert_eq!(project(&q, &datum), datum);
}

#[test]
fn test_select_star_with_where_clause() {
    let q = query("select * from stream where a == 1");
    let datum = doc(json!({"a": 1, "b": 2}));
    assert_eq!(project(&q, &datum), datum);
}

// ============================================================================
// Where and group-by fields are required too
// ============================================================================

#[test]
fn test_projection_covers_where_and_group_by_fields() {
    let q = query(
        "select path from stream window 1 where method == 'get' and e['req']['url'] == 'http://www.netflix.com' group by referrer",
    );
    let datum = doc(json!({
        "req": {"url": "http://www.netflix.com", "method": "get"},
        "resp": "movies!",
        "referrer": "none",
        "path": "/",
        "method": "put"
    }));
    assert_eq!(
        project(&q, &datum),
        doc(json!({
            "req": {"url": "http://www.netflix.com"},
            "referrer": "none",
            "path": "/",
            "method": "put"
        }))
    );
}

#[test]
fn test_window_contributes_no_field() {
    let q = query("select a from stream window 100");
    let datum = doc(json!({"a": 1, "window": 5, "100": true}));
    assert_eq!(project(&q, &datum), doc(json!({"a": 1})));
}

// ============================================================================
// Merging and absence
// ============================================================================

#[test]
fn test_paths_with_common_prefix_merge() {
    let q = query("select e['req']['url'], e['req']['method'] from stream");
    let datum = doc(json!({"req": {"url": "u", "method": "m", "body": "x"}}));
    assert_eq!(
        project(&q, &datum),
        doc(json!({"req": {"url": "u", "method": "m"}}))
    );
}

#[test]
fn test_whole_subtree_wins_over_partial() {
    let q = query("select e['req'], e['req']['url'] from stream");
    let datum = doc(json!({"req": {"url": "u", "method": "m"}}));
    assert_eq!(
        project(&q, &datum),
        doc(json!({"req": {"url": "u", "method": "m"}}))
    );
}

#[test]
fn test_absent_paths_are_omitted() {
    let q = query("select e['req']['url'], resp from stream");
    // url missing below req: no empty {"req": {}} stub may appear
    let datum = doc(json!({"req": {"method": "get"}, "resp": "r"}));
    assert_eq!(project(&q, &datum), doc(json!({"resp": "r"})));

    let datum = doc(json!({"other": 1}));
    assert_eq!(project(&q, &datum), doc(json!({})));
}

#[test]
fn test_out_of_range_index_is_omitted() {
    let q = query("select e['commands'][9] from stream");
    let datum = doc(json!({"commands": ["a", "b"]}));
    assert_eq!(project(&q, &datum), doc(json!({})));
}

#[test]
fn test_empty_document_projects_to_empty() {
    let q = query("select a, e['b']['c'] from stream");
    assert_eq!(project(&q, &doc(json!({}))), doc(json!({})));
}

// ============================================================================
// Prefix and star paths
// ============================================================================

#[test]
fn test_prefix_select() {
    let q = query("select e['version'], e[^'result'] from stream");
    let datum = doc(json!({
        "version": "1.0.1",
        "timestamp": "12345678910111213",
        "result_a": "SUCCESS",
        "result_b": "SUCCESS",
        "result_c": "FAILURE"
    }));
    assert_eq!(
        project(&q, &datum),
        doc(json!({
            "version": "1.0.1",
            "result_a": "SUCCESS",
            "result_b": "SUCCESS",
            "result_c": "FAILURE"
        }))
    );
}

#[test]
fn test_star_path_keeps_whole_container() {
    let q = query("select e['version'] from stream where e['errors'][*]['code'] == 'err123'");
    let datum = doc(json!({
        "version": "1.0.1",
        "timestamp": "t",
        "errors": {
            "err1": {"code": "err123"},
            "err2": {"code": "err456"}
        }
    }));
    let projected = project(&q, &datum);
    assert_eq!(
        projected,
        doc(json!({
            "version": "1.0.1",
            "errors": {
                "err1": {"code": "err123"},
                "err2": {"code": "err456"}
            }
        }))
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_projection_is_idempotent() {
    let cases = vec![
        ("select e['req']['url'], resp from stream",
         json!({"req": {"url": "u", "method": "m"}, "resp": "r", "x": 1})),
        ("select e['commands'][1] from stream", json!({"commands": ["a", "b", "c"]})),
        ("select * from stream", json!({"a": 1, "b": [2, 3]})),
        ("select e[^'result'] from stream", json!({"result_a": 1, "other": 2})),
    ];

    for (text, datum) in cases {
        let q = query(text);
        let datum = doc(datum);
        let once = project(&q, &datum);
        let twice = project(&q, &once);
        assert_eq!(once, twice, "not idempotent for: {}", text);
    }
}

#[test]
fn test_projection_never_invents_values() {
    let q = query("select e['req']['url'], missing, e['list'][0] from stream");
    let datum = doc(json!({"req": {"url": "u"}, "list": ["first"], "extra": true}));
    let projected = project(&q, &datum);
    assert_eq!(
        projected,
        doc(json!({"req": {"url": "u"}, "list": {"0": "first"}}))
    );
}

#[test]
fn test_projection_does_not_mutate_the_source() {
    let q = query("select e['req']['url'] from stream");
    let datum = doc(json!({"req": {"url": "u", "method": "m"}}));
    let before = datum.clone();
    let _ = project(&q, &datum);
    assert_eq!(datum, before);
}
