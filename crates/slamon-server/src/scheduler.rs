use chrono::Utc;
use slamon_assess::{assess_active_agreements, AssessConfig};
use slamon_monitor::MonitoringAdapter;
use slamon_notify::ViolationNotifier;
use slamon_storage::Repository;
use std::sync::Arc;
use tokio::time::{interval, MissedTickBehavior};

/// Periodic assessment driver.
///
/// Owns the three collaborator ports for the lifetime of the process and
/// runs one assessment round per tick. The interval skips missed ticks: a
/// round that overruns the check period coalesces with the next one instead
/// of queueing behind it.
pub struct AssessmentScheduler {
    repo: Arc<dyn Repository>,
    adapter: Arc<dyn MonitoringAdapter>,
    notifier: Option<Arc<dyn ViolationNotifier>>,
    check_period: std::time::Duration,
    transient: chrono::Duration,
}

impl AssessmentScheduler {
    pub fn new(
        repo: Arc<dyn Repository>,
        adapter: Arc<dyn MonitoringAdapter>,
        notifier: Option<Arc<dyn ViolationNotifier>>,
        check_period: std::time::Duration,
        transient: chrono::Duration,
    ) -> Self {
        Self {
            repo,
            adapter,
            notifier,
            check_period,
            transient,
        }
    }

    pub async fn run(&self) {
        tracing::info!(
            check_period = ?self.check_period,
            transient = ?self.transient,
            "Assessment scheduler started"
        );

        let mut tick = interval(self.check_period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            // the tick timestamp is the single current time for the round
            let cfg = AssessConfig {
                now: Utc::now(),
                transient: self.transient,
            };
            assess_active_agreements(
                self.repo.as_ref(),
                self.adapter.as_ref(),
                self.notifier.as_deref(),
                &cfg,
            )
            .await;
        }
    }
}
