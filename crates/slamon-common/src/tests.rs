use crate::types::*;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

fn make_value(key: &str, value: f64, secs: i64) -> MetricValue {
    MetricValue {
        key: key.to_string(),
        value: MetricScalar::Float(value),
        datetime: Utc.timestamp_opt(secs, 0).unwrap(),
        resource: None,
    }
}

#[test]
fn agreement_state_round_trips_lowercase() {
    let json = serde_json::to_string(&AgreementState::Started).unwrap();
    assert_eq!(json, "\"started\"");
    let back: AgreementState = serde_json::from_str("\"terminated\"").unwrap();
    assert_eq!(back, AgreementState::Terminated);
    assert_eq!("stopped".parse::<AgreementState>().unwrap(), AgreementState::Stopped);
    assert!("paused".parse::<AgreementState>().is_err());
}

#[test]
fn metric_scalar_deserializes_untagged() {
    let v: MetricScalar = serde_json::from_str("5").unwrap();
    assert_eq!(v, MetricScalar::Int(5));
    let v: MetricScalar = serde_json::from_str("5.5").unwrap();
    assert_eq!(v, MetricScalar::Float(5.5));
    let v: MetricScalar = serde_json::from_str("true").unwrap();
    assert_eq!(v, MetricScalar::Bool(true));
}

#[test]
fn tuple_helpers_pick_newest_value() {
    let mut tuple: ExpressionData = HashMap::new();
    tuple.insert("a".to_string(), make_value("host-1", 1.0, 10));
    tuple.insert("b".to_string(), make_value("host-1", 2.0, 30));
    tuple.insert("c".to_string(), make_value("host-1", 3.0, 20));

    assert_eq!(tuple_datetime(&tuple), Some(Utc.timestamp_opt(30, 0).unwrap()));
    assert_eq!(tuple_key(&tuple), Some("host-1"));
    assert_eq!(tuple_datetime(&HashMap::new()), None);
}

#[test]
fn variable_window_requires_nonzero() {
    let plain = Variable {
        name: "x".to_string(),
        metric: "metric_x".to_string(),
        aggregation: None,
    };
    assert_eq!(plain.window(), None);

    let zero = Variable {
        aggregation: Some(Aggregation {
            kind: AggregationKind::Average,
            window: 0,
        }),
        ..plain.clone()
    };
    assert_eq!(zero.window(), None);

    let windowed = Variable {
        aggregation: Some(Aggregation {
            kind: AggregationKind::Average,
            window: 60,
        }),
        ..plain
    };
    assert_eq!(windowed.window(), Some(60));
}

#[test]
fn assessment_guarantee_mut_creates_default_state() {
    let mut assessment = Assessment::default();
    assert!(assessment.guarantee("gt").is_none());

    assessment.guarantee_mut("gt").last_execution = Some(Utc::now());
    assert!(assessment.guarantee("gt").unwrap().last_execution.is_some());
    assert!(assessment.guarantee("gt").unwrap().first_execution.is_none());
}

#[test]
fn agreement_parses_from_seed_json() {
    let doc = r#"{
        "id": "a-01",
        "name": "web latency",
        "state": "started",
        "details": {
            "id": "a-01",
            "name": "web latency",
            "client": {"id": "c-01", "name": "acme"},
            "creation": "2024-01-01T00:00:00Z",
            "variables": [
                {"name": "latency", "metric": "http_request_seconds"},
                {"name": "load", "metric": "node_load1",
                 "aggregation": {"kind": "average", "window": 60}}
            ],
            "guarantees": [
                {"name": "fast", "constraint": "latency < 0.5"}
            ]
        }
    }"#;

    let a: Agreement = serde_json::from_str(doc).unwrap();
    assert_eq!(a.state, AgreementState::Started);
    assert_eq!(a.details.variables.len(), 2);
    assert_eq!(a.details.variable("load").unwrap().window(), Some(60));
    assert!(a.details.variable("missing").is_none());
    // assessment defaults to empty when absent from the document
    assert!(a.assessment.first_execution.is_none());
    assert!(a.assessment.guarantees.is_empty());
}

#[test]
fn result_violations_are_ordered_by_time() {
    let mk = |gt: &str, secs: i64| Violation {
        agreement_id: "a-01".to_string(),
        guarantee: gt.to_string(),
        datetime: Utc.timestamp_opt(secs, 0).unwrap(),
        constraint: "x < 10".to_string(),
        values: vec![],
    };

    let mut result = AssessmentResult::default();
    result.violated.insert(
        "gt2".to_string(),
        GuaranteeResult {
            metrics: vec![],
            violations: vec![mk("gt2", 30)],
        },
    );
    result.violated.insert(
        "gt1".to_string(),
        GuaranteeResult {
            metrics: vec![],
            violations: vec![mk("gt1", 10), mk("gt1", 20)],
        },
    );

    assert!(result.has_violations());
    let ordered: Vec<i64> = result
        .violations()
        .iter()
        .map(|v| v.datetime.timestamp())
        .collect();
    assert_eq!(ordered, vec![10, 20, 30]);

    let empty = AssessmentResult::default();
    assert!(!empty.has_violations());
}
