use crate::planner::build_retrieval_items;
use crate::{error, AdapterHandle, MonitoringAdapter, Retriever};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slamon_common::types::{
    tuple_datetime, Agreement, AggregationKind, ExpressionData, Guarantee, MetricScalar,
    MetricValue, Variable,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Adapter that turns any [`Retriever`] into a full monitoring adapter:
/// plan the retrieval windows, fetch raw series, run the per-variable
/// processing step, and align values into complete tuples.
pub struct GenericAdapter {
    retriever: Arc<dyn Retriever>,
    processor: Processor,
}

impl GenericAdapter {
    pub fn new(retriever: Arc<dyn Retriever>, processor: Processor) -> Self {
        Self {
            retriever,
            processor,
        }
    }
}

impl MonitoringAdapter for GenericAdapter {
    fn initialize(&self, agreement: &Agreement) -> Box<dyn AdapterHandle> {
        Box::new(GenericHandle {
            agreement: agreement.clone(),
            retriever: self.retriever.clone(),
            processor: self.processor,
        })
    }
}

struct GenericHandle {
    agreement: Agreement,
    retriever: Arc<dyn Retriever>,
    processor: Processor,
}

#[async_trait]
impl AdapterHandle for GenericHandle {
    async fn get_values(
        &mut self,
        gt: &Guarantee,
        var_names: &[String],
        now: DateTime<Utc>,
    ) -> error::Result<Vec<ExpressionData>> {
        let items = build_retrieval_items(&self.agreement, gt, var_names, now);
        let raw = self.retriever.retrieve_all(&self.agreement, &items).await?;

        let mut series: HashMap<String, Vec<MetricValue>> = HashMap::new();
        for item in &items {
            let values = raw.get(&item.variable.name).cloned().unwrap_or_default();
            series.insert(
                item.variable.name.clone(),
                self.processor.process(&item.variable, values),
            );
        }

        let tuples = align_by_key(&series, var_names);
        tracing::debug!(
            agreement_id = %self.agreement.id,
            guarantee = %gt.name,
            tuples = tuples.len(),
            "Aligned retrieved values"
        );
        Ok(tuples)
    }
}

/// Per-variable post-processing applied between retrieval and alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Processor {
    /// Series pass through untouched.
    #[default]
    Identity,
    /// Windowed variables with an `average` aggregation collapse to a
    /// single averaged point; everything else passes through.
    Aggregate,
}

impl Processor {
    pub fn process(&self, variable: &Variable, values: Vec<MetricValue>) -> Vec<MetricValue> {
        match self {
            Processor::Identity => values,
            Processor::Aggregate => aggregate(variable, values),
        }
    }
}

fn aggregate(variable: &Variable, values: Vec<MetricValue>) -> Vec<MetricValue> {
    let averaged = variable.window().is_some()
        && variable
            .aggregation
            .as_ref()
            .is_some_and(|a| a.kind == AggregationKind::Average);
    if !averaged {
        return values;
    }
    let Some(newest) = values.iter().max_by_key(|m| m.datetime).cloned() else {
        return values;
    };

    let avg = values.iter().map(|m| m.value.as_f64()).sum::<f64>() / values.len() as f64;
    vec![MetricValue {
        key: newest.key,
        value: MetricScalar::Float(avg),
        datetime: newest.datetime,
        resource: newest.resource,
    }]
}

/// Groups values sharing an observation key across all referenced variables
/// into evaluation tuples.
///
/// A key produces a tuple only when every name in `var_names` contributed a
/// value for it; for duplicate samples of one (variable, key) pair the
/// newest datetime wins. Tuples come back ordered by their max datetime.
pub fn align_by_key(
    series: &HashMap<String, Vec<MetricValue>>,
    var_names: &[String],
) -> Vec<ExpressionData> {
    if var_names.is_empty() {
        return Vec::new();
    }

    let mut buckets: HashMap<String, ExpressionData> = HashMap::new();
    for name in var_names {
        let Some(values) = series.get(name) else {
            continue;
        };
        for value in values {
            let tuple = buckets.entry(value.key.clone()).or_default();
            let newer = tuple
                .get(name)
                .map_or(true, |existing| value.datetime > existing.datetime);
            if newer {
                tuple.insert(name.clone(), value.clone());
            }
        }
    }

    let mut tuples: Vec<ExpressionData> = buckets
        .into_values()
        .filter(|tuple| var_names.iter().all(|name| tuple.contains_key(name)))
        .collect();
    tuples.sort_by_key(|tuple| tuple_datetime(tuple));
    tuples
}
