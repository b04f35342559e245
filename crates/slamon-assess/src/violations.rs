use chrono::{DateTime, Duration, Utc};
use slamon_common::types::{
    tuple_datetime, Agreement, ExpressionData, Guarantee, MetricValue, Violation,
};

/// Turns the failing tuples of one guarantee into violation records,
/// applying transient-time suppression.
///
/// Tuples are visited in observation order. A tuple whose time falls inside
/// the transient window after the most recent violation (persisted from the
/// previous run, or emitted earlier in this one) is skipped; otherwise a
/// fresh violation is emitted and becomes the new suppression reference, so
/// consecutive violations are always at least `transient` apart.
pub fn build_violations(
    a: &Agreement,
    gt: &Guarantee,
    failed: &[ExpressionData],
    transient: Duration,
) -> Vec<Violation> {
    let mut last_violation = a
        .assessment
        .guarantee(&gt.name)
        .and_then(|g| g.last_violation.clone());
    let mut violations = Vec::with_capacity(failed.len());

    for tuple in failed {
        let Some(datetime) = tuple_datetime(tuple) else {
            continue;
        };
        if in_transient_time(datetime, last_violation.as_ref(), transient) {
            tracing::debug!(
                agreement_id = %a.id,
                guarantee = %gt.name,
                tuple_time = %datetime,
                "Skipping failing tuple inside transient time"
            );
            continue;
        }

        let mut entries: Vec<(&String, &MetricValue)> = tuple.iter().collect();
        entries.sort_by(|(x, _), (y, _)| x.cmp(y));
        let values = entries.into_iter().map(|(_, m)| m.clone()).collect();

        let v = Violation {
            agreement_id: a.id.clone(),
            guarantee: gt.name.clone(),
            datetime,
            constraint: gt.constraint.clone(),
            values,
        };
        last_violation = Some(v.clone());
        violations.push(v);
    }
    violations
}

/// A first violation is never in transient time. Overflow of
/// `last + transient` means the window never closes.
fn in_transient_time(
    new_violation: DateTime<Utc>,
    last: Option<&Violation>,
    transient: Duration,
) -> bool {
    let Some(last) = last else {
        return false;
    };
    match last.datetime.checked_add_signed(transient) {
        Some(bound) => new_violation < bound,
        None => true,
    }
}
