//! Agreement persistence layer.
//!
//! The engine needs very little from its repository: list the agreements in
//! a set of states at the start of a tick, and persist each one back after
//! assessment. `get`/`create` exist for seeding and administration.
//! The default backend is the in-memory [`memory::MemRepository`].

pub mod error;
pub mod memory;

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use slamon_common::types::{Agreement, AgreementState};

/// Persistence backend for agreements.
///
/// Implementations must be safe to share across threads (`Send + Sync`);
/// the assessment driver holds one instance for the lifetime of the
/// process. Only the driver writes the assessment subtree, so backends do
/// not need per-record locking beyond atomic replacement.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Returns the agreement with the given id.
    async fn get_agreement(&self, id: &str) -> error::Result<Agreement>;

    /// Returns all agreements currently in any of the supplied states.
    async fn get_agreements_by_state(
        &self,
        states: &[AgreementState],
    ) -> error::Result<Vec<Agreement>>;

    /// Stores a new agreement. Fails if the id already exists.
    async fn create_agreement(&self, agreement: &Agreement) -> error::Result<Agreement>;

    /// Persists the full agreement. Only the state and the assessment
    /// subtree are expected to have changed since the last read.
    async fn update_agreement(&self, agreement: &Agreement) -> error::Result<Agreement>;
}
