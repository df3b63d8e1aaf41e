//! End-to-end tests: JSON filter documents in, nested predicate JSON out.

use pretty_assertions::assert_eq;
use serde_json::json;

use serafim::prelude::*;

fn compile_to_json(input: serde_json::Value) -> serde_json::Value {
    let compiled = Compiler::default().compile_json(&input).unwrap();
    serde_json::to_value(compiled).unwrap()
}

fn cmp(operator: &str, operand: serde_json::Value) -> serde_json::Value {
    json!({"$compare": {"operator": operator, "operand": operand}})
}

#[test]
fn test_legacy_array_of_leaves() {
    let out = compile_to_json(json!([
        {"field": "debt.dueDate", "operation": ">=", "value": {"$date": "2024-05-01T00:00:00Z"}},
        {"field": "debt.status", "operation": "IN", "value": ["open", "late"]},
        {"field": "storeId", "value": 123}
    ]));

    assert_eq!(
        out,
        json!({
            "debt": {
                "dueDate": cmp(">=", json!({"timestamp": "2024-05-01T00:00:00Z"})),
                "status": cmp("IN", json!({"list": [{"text": "open"}, {"text": "late"}]}))
            },
            "storeId": cmp("=", json!({"number": 123}))
        })
    );
}

#[test]
fn test_or_at_top_level_is_array() {
    let out = compile_to_json(json!({"$or": [
        {"field": "a", "value": 1},
        {"field": "b", "value": 2}
    ]}));

    assert_eq!(
        out,
        json!([
            {"a": cmp("=", json!({"number": 1}))},
            {"b": cmp("=", json!({"number": 2}))}
        ])
    );
}

#[test]
fn test_distribution_over_nested_or() {
    let out = compile_to_json(json!({"$and": [
        {"$or": [{"field": "a", "value": 1}, {"field": "a", "value": 2}]},
        {"field": "b", "value": 3}
    ]}));

    assert_eq!(
        out,
        json!([
            {"a": cmp("=", json!({"number": 1})), "b": cmp("=", json!({"number": 3}))},
            {"a": cmp("=", json!({"number": 2})), "b": cmp("=", json!({"number": 3}))}
        ])
    );
}

#[test]
fn test_keywords_booleans_and_nulls() {
    let out = compile_to_json(json!([
        {"field": "archivedAt", "operation": "IS", "value": "NULL"},
        {"field": "verified", "value": true},
        {"field": "deletedAt", "operation": "!=", "value": null}
    ]));

    assert_eq!(
        out,
        json!({
            "archivedAt": cmp("IS", json!({"keyword": "NULL"})),
            "deletedAt": {"$isNull": true},
            "verified": true
        })
    );
}

#[test]
fn test_between_bounds() {
    let out = compile_to_json(json!([
        {"field": "age", "operation": "BETWEEN", "value": [10, 20]},
        {"field": "name", "operation": "BETWEEN", "value": ["a", "m"]}
    ]));

    assert_eq!(
        out["age"],
        cmp("BETWEEN", json!({"range": {"low": {"number": 10}, "high": {"number": 20}}}))
    );
    assert_eq!(
        out["name"],
        cmp("BETWEEN", json!({"range": {"low": {"text": "a"}, "high": {"text": "m"}}}))
    );
}

#[test]
fn test_rendered_fragments() {
    let compiled = compile(Some(&and([
        between("createdAt", chrono_date(2024, 1, 1), chrono_date(2024, 12, 31)),
        is_in("status", ["open", "late"]),
        like("customer.name", "o'neil"),
    ])))
    .unwrap();
    let predicate = &compiled.alternatives()[0];

    let rendered: Vec<String> = predicate
        .leaves()
        .into_iter()
        .map(|(path, terminal)| terminal.render(&path))
        .collect();

    assert_eq!(
        rendered,
        vec![
            "createdAt BETWEEN '2024-01-01T00:00:00.000Z' AND '2024-12-31T00:00:00.000Z'",
            "status IN ('open','late')",
            "customer.name LIKE '%o''neil%'",
        ]
    );
}

#[test]
fn test_search_document() {
    let search: Search = serde_json::from_value(json!({
        "where": {"$or": [
            {"field": "user.person.name", "operation": "ILIKE", "value": "ann"},
            {"field": "user.email", "operation": "ILIKE", "value": "ann"}
        ]},
        "order": [
            {"field": "user.person.name", "sortOrder": "asc"},
            {"field": "createdAt", "sortOrder": "desc"}
        ]
    }))
    .unwrap();

    let options = find_options(&search).unwrap();
    let out = serde_json::to_value(&options).unwrap();

    assert_eq!(out["relations"], json!({"user": {"person": true}}));
    assert_eq!(
        out["order"],
        json!({"createdAt": "desc", "user": {"person": {"name": "asc"}}})
    );
    assert_eq!(out["where"].as_array().map(Vec::len), Some(2));
    assert_eq!(
        serde_json::to_string(&options.order).unwrap(),
        r#"{"user":{"person":{"name":"asc"}},"createdAt":"desc"}"#
    );
}

#[test]
fn test_errors_surface() {
    let compiler = Compiler::default();

    let err = compiler
        .compile_json(&json!({"field": "a", "operation": "CONTAINS", "value": 1}))
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown operation 'CONTAINS'");

    let err = compiler
        .compile_json(&json!({"field": "a", "operation": "IN", "value": "x"}))
        .unwrap_err();
    assert!(matches!(err, CompileError::InvalidOperand { operation: Operation::In, .. }));

    let err = compiler.compile_json(&json!(42)).unwrap_err();
    assert!(matches!(err, CompileError::InvalidExpression(_)));
}

fn chrono_date(y: i32, m: u32, d: u32) -> Value {
    use chrono::TimeZone;
    Value::Date(chrono::Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
}
