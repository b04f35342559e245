use chrono::{DateTime, Duration, Utc};
use slamon_common::types::{Agreement, Guarantee, Variable};

/// One retrieval request: the values of `variable` inside `(from, to]`,
/// evaluated on behalf of `guarantee`.
#[derive(Debug, Clone)]
pub struct RetrievalItem {
    pub guarantee: Guarantee,
    pub variable: Variable,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Builds one retrieval request per variable referenced by a guarantee
/// term's constraint.
///
/// The interval start depends on the variable: a windowed variable always
/// queries its trailing aggregation window, everything else starts where
/// the previous evaluation of this guarantee (or agreement) left off.
pub fn build_retrieval_items(
    a: &Agreement,
    gt: &Guarantee,
    var_names: &[String],
    to: DateTime<Utc>,
) -> Vec<RetrievalItem> {
    let default_from = default_from(a, gt);

    var_names
        .iter()
        .map(|name| {
            // A name the agreement does not declare still resolves: the
            // metric handle defaults to the variable name itself.
            let variable = a.details.variable(name).cloned().unwrap_or(Variable {
                name: name.clone(),
                metric: name.clone(),
                aggregation: None,
            });
            let from = from_for_variable(&variable, default_from, to);
            RetrievalItem {
                guarantee: gt.clone(),
                variable,
                from,
                to,
            }
        })
        .collect()
}

fn default_from(a: &Agreement, gt: &Guarantee) -> DateTime<Utc> {
    a.assessment
        .guarantee(&gt.name)
        .and_then(|g| g.last_execution)
        .or(a.assessment.last_execution)
        .unwrap_or(a.details.creation)
}

fn from_for_variable(v: &Variable, default_from: DateTime<Utc>, to: DateTime<Utc>) -> DateTime<Utc> {
    match v.window() {
        Some(window) => to - Duration::seconds(window as i64),
        None => default_from,
    }
}
