use crate::planner::RetrievalItem;
use crate::{error, Retriever};
use async_trait::async_trait;
use rand::Rng;
use slamon_common::types::{Agreement, MetricScalar, MetricValue};
use std::collections::HashMap;

/// Development backend: answers every retrieval request with `size`
/// synthetic samples in `[0, 1)`, evenly spaced up to the requested `to`.
///
/// Samples share observation keys across variables so the alignment step
/// produces one tuple per sample index.
pub struct DummyRetriever {
    pub size: usize,
}

#[async_trait]
impl Retriever for DummyRetriever {
    async fn retrieve_all(
        &self,
        _agreement: &Agreement,
        items: &[RetrievalItem],
    ) -> error::Result<HashMap<String, Vec<MetricValue>>> {
        let mut rng = rand::thread_rng();
        let mut result = HashMap::new();

        for item in items {
            let count = self.size.max(1);
            let step = (item.to - item.from) / count as i32;
            let values = (0..count)
                .map(|i| MetricValue {
                    key: format!("sample-{i}"),
                    value: MetricScalar::Float(rng.gen::<f64>()),
                    datetime: item.to - step * (count - 1 - i) as i32,
                    resource: None,
                })
                .collect();
            result.insert(item.variable.name.clone(), values);
        }
        Ok(result)
    }
}
