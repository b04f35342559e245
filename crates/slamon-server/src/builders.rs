use crate::config::{AdapterSection, NotifierSection, RepositorySection};
use anyhow::{bail, Context, Result};
use slamon_common::types::Agreement;
use slamon_monitor::dummy::DummyRetriever;
use slamon_monitor::generic::{GenericAdapter, Processor};
use slamon_monitor::MonitoringAdapter;
use slamon_notify::plugin::NotifierRegistry;
use slamon_notify::ViolationNotifier;
use slamon_storage::memory::MemRepository;
use slamon_storage::Repository;
use std::sync::Arc;

pub fn build_repository(cfg: &RepositorySection) -> Result<Arc<dyn Repository>> {
    match cfg.kind.as_str() {
        "memory" => Ok(Arc::new(MemRepository::new())),
        other => bail!("unknown repository type '{other}'"),
    }
}

pub fn build_adapter(cfg: &AdapterSection) -> Result<Arc<dyn MonitoringAdapter>> {
    let processor = match cfg.processing.as_str() {
        "identity" => Processor::Identity,
        "aggregate" => Processor::Aggregate,
        other => bail!("unknown adapter processing step '{other}'"),
    };
    match cfg.kind.as_str() {
        "dummy" => Ok(Arc::new(GenericAdapter::new(
            Arc::new(DummyRetriever { size: cfg.size }),
            processor,
        ))),
        other => bail!("unknown adapter type '{other}'"),
    }
}

pub fn build_notifier(cfg: &NotifierSection) -> Result<Option<Arc<dyn ViolationNotifier>>> {
    if cfg.kind == "none" {
        return Ok(None);
    }
    let registry = NotifierRegistry::default();
    let notifier = registry.create(&cfg.kind, &cfg.settings)?;
    Ok(Some(notifier))
}

/// Loads agreements from a JSON seed file into the repository. Agreements
/// whose id already exists are skipped with a warning.
pub async fn seed_agreements(repo: &dyn Repository, path: &str) -> Result<usize> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read agreements file '{path}'"))?;
    let agreements: Vec<Agreement> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse agreements file '{path}'"))?;

    let mut loaded = 0;
    for agreement in &agreements {
        match repo.create_agreement(agreement).await {
            Ok(_) => {
                tracing::info!(agreement_id = %agreement.id, "Agreement loaded");
                loaded += 1;
            }
            Err(e) => {
                tracing::warn!(
                    agreement_id = %agreement.id,
                    error = %e,
                    "Skipping agreement from seed file"
                );
            }
        }
    }
    Ok(loaded)
}
