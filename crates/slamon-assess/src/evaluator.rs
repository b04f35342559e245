use crate::error::Result;
use crate::expression::{ConstraintExpression, Verdict};
use crate::violations::build_violations;
use chrono::{DateTime, Duration, Utc};
use slamon_common::types::{
    tuple_key, Agreement, AgreementState, AssessmentResult, ExpressionData, Guarantee,
    GuaranteeResult,
};
use slamon_monitor::{AdapterHandle, MonitoringAdapter};
use slamon_notify::ViolationNotifier;
use slamon_storage::Repository;

/// Per-tick assessment parameters.
///
/// `now` is stamped once by the driver and is the single current time for
/// everything below it; metrics are retrieved up to `now`, and all
/// bookkeeping timestamps are set to it.
#[derive(Debug, Clone, Copy)]
pub struct AssessConfig {
    pub now: DateTime<Utc>,
    /// Minimum gap between successive violations of the same guarantee.
    pub transient: Duration,
}

/// One driver tick: assess every agreement in {started, stopped}, persist
/// each mutated agreement, and hand results with violations to the
/// notifier.
///
/// Stopped agreements are scanned only so the expiration trip can move them
/// to terminated. A repository read error skips the whole tick; any other
/// per-agreement error is logged and the loop continues.
pub async fn assess_active_agreements(
    repo: &dyn Repository,
    adapter: &dyn MonitoringAdapter,
    notifier: Option<&dyn ViolationNotifier>,
    cfg: &AssessConfig,
) {
    let agreements = match repo
        .get_agreements_by_state(&[AgreementState::Started, AgreementState::Stopped])
        .await
    {
        Ok(agreements) => agreements,
        Err(e) => {
            tracing::error!(error = %e, "Error getting active agreements; skipping tick");
            return;
        }
    };

    tracing::info!(count = agreements.len(), "Assessing active agreements");
    for mut agreement in agreements {
        let result = assess_agreement(&mut agreement, adapter, cfg).await;
        if let Err(e) = repo.update_agreement(&agreement).await {
            tracing::error!(
                agreement_id = %agreement.id,
                error = %e,
                "Error persisting agreement after assessment"
            );
        }
        if result.has_violations() {
            if let Some(notifier) = notifier {
                notifier.notify_violations(&agreement, &result).await;
            }
        }
    }
}

/// Assesses one agreement: trip expiration, evaluate if started, update the
/// assessment bookkeeping.
///
/// The agreement is mutated in place (state and assessment subtree only);
/// persistence is the caller's responsibility. On an evaluation error the
/// result is empty and the assessment subtree is left untouched for this
/// tick.
pub async fn assess_agreement(
    a: &mut Agreement,
    adapter: &dyn MonitoringAdapter,
    cfg: &AssessConfig,
) -> AssessmentResult {
    tracing::debug!(agreement_id = %a.id, state = %a.state, "Assessing agreement");

    if a.details.expiration.is_some_and(|exp| exp < cfg.now) {
        tracing::info!(agreement_id = %a.id, "Agreement expired");
        a.state = AgreementState::Terminated;
    }

    if a.state != AgreementState::Started {
        return AssessmentResult::default();
    }

    match evaluate_agreement(a, adapter, cfg).await {
        Ok(result) => {
            update_assessment(a, &result, cfg.now);
            result
        }
        Err(e) => {
            tracing::warn!(agreement_id = %a.id, error = %e, "Error evaluating agreement");
            AssessmentResult::default()
        }
    }
}

/// Evaluates the guarantee terms of an agreement, in declaration order,
/// against tuples supplied by the monitoring adapter.
///
/// The adapter must feed the evaluation correctly: for a constraint like
/// `"a > b"` it has to supply co-measured pairs of values. A constraint
/// that does not parse aborts the whole agreement's evaluation.
pub async fn evaluate_agreement(
    a: &Agreement,
    adapter: &dyn MonitoringAdapter,
    cfg: &AssessConfig,
) -> Result<AssessmentResult> {
    let mut handle = adapter.initialize(a);
    let mut result = AssessmentResult::default();

    for gt in &a.details.guarantees {
        let (failed, last) = evaluate_guarantee(a, gt, handle.as_mut(), cfg).await?;
        if !failed.is_empty() {
            let violations = build_violations(a, gt, &failed, cfg.transient);
            result.violated.insert(
                gt.name.clone(),
                GuaranteeResult {
                    metrics: failed,
                    violations,
                },
            );
        }
        result.last_values.insert(gt.name.clone(), last);
        result.last_execution.insert(gt.name.clone(), cfg.now);
    }
    Ok(result)
}

/// Evaluates one guarantee term. Returns the failing tuples and the last
/// tuple seen (empty if the adapter had no observations).
async fn evaluate_guarantee(
    a: &Agreement,
    gt: &Guarantee,
    handle: &mut dyn AdapterHandle,
    cfg: &AssessConfig,
) -> Result<(Vec<ExpressionData>, ExpressionData)> {
    tracing::debug!(agreement_id = %a.id, guarantee = %gt.name, "Evaluating guarantee");

    let expression = ConstraintExpression::parse(&gt.constraint)?;
    let var_names = expression.variables();

    let values = match handle.get_values(gt, &var_names, cfg.now).await {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(
                agreement_id = %a.id,
                guarantee = %gt.name,
                error = %e,
                "Metric retrieval failed; treating as no observations"
            );
            Vec::new()
        }
    };

    let mut failed: Vec<ExpressionData> = Vec::new();
    for tuple in &values {
        match expression.evaluate(tuple) {
            Ok(Verdict::Satisfied) => {}
            Ok(Verdict::Breached) => failed.push(tuple.clone()),
            Ok(Verdict::Undecided) => {
                tracing::debug!(
                    guarantee = %gt.name,
                    constraint = %gt.constraint,
                    "Constraint result is neither true nor false; dropping tuple"
                );
            }
            Err(e) => {
                tracing::warn!(
                    guarantee = %gt.name,
                    error = %e,
                    "Constraint evaluation failed on a tuple; dropping it"
                );
            }
        }
    }

    let last = values.last().cloned().unwrap_or_default();
    Ok((failed, last))
}

fn update_assessment(a: &mut Agreement, result: &AssessmentResult, now: DateTime<Utc>) {
    if a.assessment.first_execution.is_none() {
        a.assessment.first_execution = Some(now);
    }
    a.assessment.last_execution = Some(now);

    let names: Vec<String> = a.details.guarantees.iter().map(|g| g.name.clone()).collect();
    for name in names {
        let last = result.last_values.get(&name);
        let last_violation = result
            .violated
            .get(&name)
            .and_then(|gt| gt.violations.last())
            .cloned();

        let state = a.assessment.guarantee_mut(&name);
        if state.first_execution.is_none() {
            state.first_execution = Some(now);
        }
        state.last_execution = Some(now);
        if let Some(last) = last {
            if let Some(key) = tuple_key(last) {
                state.last_values.insert(key.to_string(), last.clone());
            }
        }
        if let Some(v) = last_violation {
            state.last_violation = Some(v);
        }
    }
}
