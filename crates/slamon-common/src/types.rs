use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementState {
    Started,
    Stopped,
    Terminated,
}

impl std::fmt::Display for AgreementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgreementState::Started => write!(f, "started"),
            AgreementState::Stopped => write!(f, "stopped"),
            AgreementState::Terminated => write!(f, "terminated"),
        }
    }
}

impl std::str::FromStr for AgreementState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "started" => Ok(AgreementState::Started),
            "stopped" => Ok(AgreementState::Stopped),
            "terminated" => Ok(AgreementState::Terminated),
            _ => Err(format!("unknown agreement state: {s}")),
        }
    }
}

/// A persisted service-level agreement.
///
/// `details` is immutable during a run. The engine mutates only `state`
/// (on expiration) and the `assessment` subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    pub id: String,
    pub name: String,
    pub state: AgreementState,
    pub details: Details,
    #[serde(default)]
    pub assessment: Assessment,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Details {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub client: Client,
    pub creation: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub guarantees: Vec<Guarantee>,
}

impl Details {
    /// Looks up a declared variable by the name used inside constraints.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }
}

/// A named reference to a backend metric.
///
/// A variable with a non-zero aggregation window is *windowed*: its
/// retrieval interval is always the trailing window, not the gap since the
/// previous evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub metric: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
}

impl Variable {
    /// Aggregation window in seconds, if this variable is windowed.
    pub fn window(&self) -> Option<u64> {
        self.aggregation
            .as_ref()
            .map(|a| a.window)
            .filter(|w| *w > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub kind: AggregationKind,
    pub window: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationKind {
    Average,
}

/// A named boolean constraint inside an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guarantee {
    pub name: String,
    pub constraint: String,
    /// Evaluation schedule hint. Carried for compatibility, not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

/// A metric observation is either a number or a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricScalar {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl MetricScalar {
    /// Numeric view used by aggregation; booleans map to 1/0.
    pub fn as_f64(&self) -> f64 {
        match self {
            MetricScalar::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            MetricScalar::Int(i) => *i as f64,
            MetricScalar::Float(v) => *v,
        }
    }
}

impl std::fmt::Display for MetricScalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricScalar::Bool(b) => write!(f, "{b}"),
            MetricScalar::Int(i) => write!(f, "{i}"),
            MetricScalar::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<f64> for MetricScalar {
    fn from(v: f64) -> Self {
        MetricScalar::Float(v)
    }
}

impl From<i64> for MetricScalar {
    fn from(v: i64) -> Self {
        MetricScalar::Int(v)
    }
}

impl From<bool> for MetricScalar {
    fn from(v: bool) -> Self {
        MetricScalar::Bool(v)
    }
}

/// One observed data point for one variable.
///
/// `key` is the observation identity: it names the entity that was measured
/// (a host, a request, a job instance) and is what tuple alignment groups
/// on across variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub key: String,
    pub value: MetricScalar,
    pub datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

/// One evaluation point: a variable-name to value snapshot where all values
/// were co-measured under the same observation key.
pub type ExpressionData = HashMap<String, MetricValue>;

/// Newest datetime across the tuple's values, or `None` for an empty tuple.
pub fn tuple_datetime(tuple: &ExpressionData) -> Option<DateTime<Utc>> {
    tuple.values().map(|m| m.datetime).max()
}

/// Observation key of the tuple, taken from its newest value.
pub fn tuple_key(tuple: &ExpressionData) -> Option<&str> {
    tuple
        .values()
        .max_by_key(|m| m.datetime)
        .map(|m| m.key.as_str())
}

/// Record produced when a guarantee term's constraint fails on a tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub agreement_id: String,
    pub guarantee: String,
    /// Newest datetime among the failing tuple's values.
    pub datetime: DateTime<Utc>,
    /// The literal constraint string at the time of evaluation.
    pub constraint: String,
    pub values: Vec<MetricValue>,
}

/// Mutable per-agreement assessment bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_execution: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution: Option<DateTime<Utc>>,
    #[serde(default)]
    pub guarantees: HashMap<String, GuaranteeAssessment>,
}

impl Assessment {
    pub fn guarantee(&self, name: &str) -> Option<&GuaranteeAssessment> {
        self.guarantees.get(name)
    }

    /// Per-guarantee state, created empty on first access.
    pub fn guarantee_mut(&mut self, name: &str) -> &mut GuaranteeAssessment {
        self.guarantees.entry(name.to_string()).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_execution: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_execution: Option<DateTime<Utc>>,
    /// Most recent tuple seen per observation key.
    #[serde(default)]
    pub last_values: HashMap<String, ExpressionData>,
    /// Most recent emitted violation, input to transient-time suppression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_violation: Option<Violation>,
}

/// Failing tuples and emitted violations for one guarantee term.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GuaranteeResult {
    pub metrics: Vec<ExpressionData>,
    pub violations: Vec<Violation>,
}

/// Output of one agreement evaluation run.
///
/// `violated` holds an entry only for guarantees that produced failing
/// tuples; `last_values` and `last_execution` hold an entry for every
/// evaluated guarantee.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub violated: HashMap<String, GuaranteeResult>,
    pub last_values: HashMap<String, ExpressionData>,
    pub last_execution: HashMap<String, DateTime<Utc>>,
}

impl AssessmentResult {
    pub fn has_violations(&self) -> bool {
        self.violated.values().any(|gt| !gt.violations.is_empty())
    }

    /// All emitted violations, ordered by datetime then guarantee name.
    pub fn violations(&self) -> Vec<&Violation> {
        let mut all: Vec<&Violation> = self
            .violated
            .values()
            .flat_map(|gt| gt.violations.iter())
            .collect();
        all.sort_by(|a, b| {
            a.datetime
                .cmp(&b.datetime)
                .then_with(|| a.guarantee.cmp(&b.guarantee))
        });
        all
    }
}
