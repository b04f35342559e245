use crate::error::{AssessError, Result};
use chrono::Utc;
use evalexpr::{
    build_operator_tree, ContextWithMutableFunctions, ContextWithMutableVariables, Function,
    HashMapContext, Node, Value,
};
use slamon_common::types::{ExpressionData, MetricScalar};
use std::collections::BTreeSet;

/// Outcome of evaluating a constraint against one tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Satisfied,
    Breached,
    /// The expression produced something that is neither a boolean nor
    /// coercible to one. The tuple is neither failing nor passing.
    Undecided,
}

/// A parsed guarantee constraint.
///
/// Wraps the expression tree and exposes the two operations the pipeline
/// needs: which variables the constraint reads, and its verdict on one
/// tuple of observed values. `timeNow()` is the single registered function,
/// returning the current Unix time in seconds; it is the only place below
/// the driver that reads the real clock.
pub struct ConstraintExpression {
    text: String,
    node: Node,
}

impl ConstraintExpression {
    pub fn parse(constraint: &str) -> Result<Self> {
        let node = build_operator_tree(constraint).map_err(|source| {
            AssessError::ConstraintParse {
                constraint: constraint.to_string(),
                source,
            }
        })?;
        Ok(Self {
            text: constraint.to_string(),
            node,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Names of the variables the constraint reads, sorted and deduplicated.
    /// Function identifiers (`timeNow`) are not variables.
    pub fn variables(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.node.iter_read_variable_identifiers().collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn evaluate(&self, tuple: &ExpressionData) -> Result<Verdict> {
        let mut context = HashMapContext::new();
        for (name, metric) in tuple {
            let value = match metric.value {
                MetricScalar::Bool(b) => Value::Boolean(b),
                MetricScalar::Int(i) => Value::Int(i),
                MetricScalar::Float(v) => Value::Float(v),
            };
            context
                .set_value(name.clone(), value)
                .map_err(|source| self.evaluation_error(source))?;
        }
        context
            .set_function(
                "timeNow".to_string(),
                Function::new(|_| Ok(Value::Float(Utc::now().timestamp() as f64))),
            )
            .map_err(|source| self.evaluation_error(source))?;

        let result = self
            .node
            .eval_with_context(&context)
            .map_err(|source| self.evaluation_error(source))?;

        Ok(match result {
            Value::Boolean(true) => Verdict::Satisfied,
            Value::Boolean(false) => Verdict::Breached,
            other => coerce(&other),
        })
    }

    fn evaluation_error(&self, source: evalexpr::EvalexprError) -> AssessError {
        AssessError::Evaluation {
            constraint: self.text.clone(),
            source,
        }
    }
}

/// Non-boolean results are coerced through their string form: a lowercase
/// rendering containing `"false"` counts as breached, `"true"` as
/// satisfied, anything else is undecided. The `false` check runs first, so
/// a result containing both substrings is a breach.
fn coerce(value: &Value) -> Verdict {
    let rendered = value.to_string().to_lowercase();
    if rendered.contains("false") {
        Verdict::Breached
    } else if rendered.contains("true") {
        Verdict::Satisfied
    } else {
        Verdict::Undecided
    }
}
