use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use slamon_common::types::*;
use slamon_monitor::{AdapterHandle, MonitoringAdapter};
use slamon_notify::ViolationNotifier;
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn tuple(entries: &[(&str, f64)], secs: i64) -> ExpressionData {
    entries
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                MetricValue {
                    key: format!("obs-{secs}"),
                    value: MetricScalar::Float(*value),
                    datetime: ts(secs),
                    resource: None,
                },
            )
        })
        .collect()
}

pub fn make_agreement(id: &str, constraint: &str) -> Agreement {
    Agreement {
        id: id.to_string(),
        name: format!("agreement {id}"),
        state: AgreementState::Started,
        details: Details {
            id: id.to_string(),
            name: format!("agreement {id}"),
            client: Client {
                id: "c-01".to_string(),
                name: "acme".to_string(),
            },
            creation: ts(0),
            expiration: None,
            variables: vec![Variable {
                name: "x".to_string(),
                metric: "metric_x".to_string(),
                aggregation: None,
            }],
            guarantees: vec![Guarantee {
                name: "gt".to_string(),
                constraint: constraint.to_string(),
                schedule: None,
            }],
        },
        assessment: Assessment::default(),
    }
}

/// Adapter whose handle serves one scripted round of tuples per
/// initialization, in order.
pub struct ScriptedAdapter {
    rounds: Mutex<VecDeque<Vec<ExpressionData>>>,
}

impl ScriptedAdapter {
    pub fn new(rounds: Vec<Vec<ExpressionData>>) -> Self {
        Self {
            rounds: Mutex::new(rounds.into()),
        }
    }
}

impl MonitoringAdapter for ScriptedAdapter {
    fn initialize(&self, _agreement: &Agreement) -> Box<dyn AdapterHandle> {
        let tuples = self
            .rounds
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Box::new(ScriptedHandle { tuples })
    }
}

struct ScriptedHandle {
    tuples: Vec<ExpressionData>,
}

#[async_trait]
impl AdapterHandle for ScriptedHandle {
    async fn get_values(
        &mut self,
        _gt: &Guarantee,
        _var_names: &[String],
        _now: DateTime<Utc>,
    ) -> slamon_monitor::error::Result<Vec<ExpressionData>> {
        Ok(self.tuples.clone())
    }
}

/// Records `(agreement_id, violation_count)` per notification.
#[derive(Default)]
pub struct CaptureNotifier {
    pub calls: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl ViolationNotifier for CaptureNotifier {
    async fn notify_violations(&self, agreement: &Agreement, result: &AssessmentResult) {
        self.calls
            .lock()
            .unwrap()
            .push((agreement.id.clone(), result.violations().len()));
    }
}
