use crate::plugin::NotifierPlugin;
use crate::{error, ViolationNotifier};
use async_trait::async_trait;
use serde_json::Value;
use slamon_common::types::{Agreement, AssessmentResult};
use std::sync::Arc;

/// Default notifier: one structured log line per violation.
pub struct LogNotifier;

#[async_trait]
impl ViolationNotifier for LogNotifier {
    async fn notify_violations(&self, agreement: &Agreement, result: &AssessmentResult) {
        for v in result.violations() {
            tracing::info!(
                agreement_id = %agreement.id,
                guarantee = %v.guarantee,
                datetime = %v.datetime,
                constraint = %v.constraint,
                values = v.values.len(),
                "Violation detected"
            );
        }
    }
}

// Plugin

pub struct LogPlugin;

impl NotifierPlugin for LogPlugin {
    fn name(&self) -> &str {
        "log"
    }

    fn create(&self, _config: &Value) -> error::Result<Arc<dyn ViolationNotifier>> {
        Ok(Arc::new(LogNotifier))
    }
}
