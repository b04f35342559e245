//! Violation delivery with pluggable notifier support.
//!
//! After each agreement assessment the driver hands `(agreement, result)`
//! pairs with at least one violation to a [`ViolationNotifier`]. Built-in
//! notifiers are the structured-log notifier (default) and a webhook
//! notifier posting a JSON violation report. Concrete notifiers are
//! created by name through the [`plugin::NotifierRegistry`].

pub mod error;
pub mod log;
pub mod plugin;
pub mod webhook;


use async_trait::async_trait;
use slamon_common::types::{Agreement, AssessmentResult};

/// Receives assessment results that contain violations and delivers them to
/// the outside world (HTTP endpoint, message bus, log...).
///
/// The call is fire-and-forget: the engine does not wait for delivery
/// confirmation, and implementations own their retries and swallow their
/// errors. `result` is guaranteed to contain at least one violation.
#[async_trait]
pub trait ViolationNotifier: Send + Sync {
    async fn notify_violations(&self, agreement: &Agreement, result: &AssessmentResult);
}

impl std::fmt::Debug for dyn ViolationNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("dyn ViolationNotifier").finish()
    }
}
