//! Monitoring side of the assessment pipeline.
//!
//! The engine never talks to a metrics backend directly: it asks a
//! [`MonitoringAdapter`] for an [`AdapterHandle`] bound to one agreement and
//! pulls aligned observation tuples from it. The built-in
//! [`generic::GenericAdapter`] composes a raw [`Retriever`] (one time-ordered
//! series per variable) with a per-variable processing step and a tuple
//! alignment step, so concrete backends only implement retrieval.

pub mod dummy;
pub mod error;
pub mod generic;
pub mod planner;


use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slamon_common::types::{Agreement, ExpressionData, Guarantee, MetricValue};
use std::collections::HashMap;

pub use planner::{build_retrieval_items, RetrievalItem};

/// Factory side of the monitoring port.
///
/// Adapters are process-wide singletons; per-agreement state (cached
/// connections, the agreement snapshot itself) lives in the handle returned
/// by [`initialize`](MonitoringAdapter::initialize), which is created once
/// per evaluation run.
pub trait MonitoringAdapter: Send + Sync {
    fn initialize(&self, agreement: &Agreement) -> Box<dyn AdapterHandle>;
}

/// Per-agreement view of the monitoring backend.
#[async_trait]
pub trait AdapterHandle: Send {
    /// Returns aligned observation tuples for one guarantee term, covering
    /// the interval since the previous evaluation (or the variable's
    /// aggregation window) up to `now`.
    ///
    /// Every returned tuple carries a value for every name in `var_names`;
    /// partial tuples are never emitted. Missing observations simply
    /// produce fewer tuples.
    async fn get_values(
        &mut self,
        gt: &Guarantee,
        var_names: &[String],
        now: DateTime<Utc>,
    ) -> error::Result<Vec<ExpressionData>>;
}

/// Raw series retrieval, consumed by [`generic::GenericAdapter`].
///
/// Implementations resolve each [`RetrievalItem`] to the observed values of
/// its variable inside `(from, to]`, keyed by variable name in the returned
/// map. Values for one variable must be time-ordered.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve_all(
        &self,
        agreement: &Agreement,
        items: &[RetrievalItem],
    ) -> error::Result<HashMap<String, Vec<MetricValue>>>;
}
