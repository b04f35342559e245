//! Core assessment pipeline.
//!
//! One tick of the engine runs [`assess_active_agreements`]: load the
//! agreements worth looking at, assess each one against live telemetry, and
//! hand results with violations to the notifier. Per agreement,
//! [`assess_agreement`] trips expiration, evaluates every guarantee term of
//! a started agreement through the monitoring adapter and the constraint
//! [`expression`] machinery, turns failing tuples into violations under
//! transient-time suppression, and updates the agreement's assessment
//! bookkeeping.
//!
//! The pipeline is pull-mode and deterministic: given the same `now` and the
//! same adapter output, re-running an assessment produces the same result
//! and the same post-state.

pub mod error;
pub mod evaluator;
pub mod expression;
pub mod violations;


pub use error::{AssessError, Result};
pub use evaluator::{
    assess_active_agreements, assess_agreement, evaluate_agreement, AssessConfig,
};
pub use expression::{ConstraintExpression, Verdict};
pub use violations::build_violations;
