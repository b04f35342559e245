use crate::plugin::NotifierPlugin;
use crate::{error, ViolationNotifier};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use slamon_common::types::{Agreement, AssessmentResult};
use std::sync::Arc;

/// Posts a JSON violation report to a configured HTTP endpoint.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
        }
    }
}

/// Report body:
/// `{"type": "violation", "agreement_id": .., "client": .., "violations": [..]}`.
pub(crate) fn build_report(agreement: &Agreement, result: &AssessmentResult) -> Value {
    serde_json::json!({
        "type": "violation",
        "agreement_id": agreement.id,
        "client": agreement.details.client,
        "violations": result.violations(),
    })
}

#[async_trait]
impl ViolationNotifier for WebhookNotifier {
    async fn notify_violations(&self, agreement: &Agreement, result: &AssessmentResult) {
        let count = result.violations().len();
        if count == 0 {
            return;
        }
        let body = build_report(agreement, result).to_string();

        for attempt in 0..3u32 {
            match self
                .client
                .post(&self.url)
                .header("Content-Type", "application/json")
                .body(body.clone())
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(
                        agreement_id = %agreement.id,
                        violations = count,
                        "Violation report delivered"
                    );
                    return;
                }
                Ok(resp) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        status = %resp.status(),
                        "Violation webhook returned non-success status, retrying"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "Violation webhook send failed, retrying"
                    );
                }
            }
            if attempt < 2 {
                tokio::time::sleep(std::time::Duration::from_millis(100 * 2u64.pow(attempt)))
                    .await;
            }
        }
        tracing::error!(
            url = %self.url,
            agreement_id = %agreement.id,
            "Violation webhook failed after 3 attempts; report dropped"
        );
    }
}

// Plugin

#[derive(Deserialize)]
struct WebhookSettings {
    url: String,
}

pub struct WebhookPlugin;

impl NotifierPlugin for WebhookPlugin {
    fn name(&self) -> &str {
        "webhook"
    }

    fn create(&self, config: &Value) -> error::Result<Arc<dyn ViolationNotifier>> {
        let settings: WebhookSettings = serde_json::from_value(config.clone())
            .map_err(|e| error::NotifyError::InvalidConfig(format!("webhook: {e}")))?;
        Ok(Arc::new(WebhookNotifier::new(&settings.url)))
    }
}
