use crate::error::{Result, StorageError};
use crate::Repository;
use async_trait::async_trait;
use slamon_common::types::{Agreement, AgreementState};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory repository, the default backend.
///
/// Suitable for development and for deployments where agreements are seeded
/// from a file at startup; nothing survives a restart.
#[derive(Default)]
pub struct MemRepository {
    agreements: RwLock<HashMap<String, Agreement>>,
}

impl MemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StorageError {
        StorageError::Other("agreement table lock poisoned".to_string())
    }
}

#[async_trait]
impl Repository for MemRepository {
    async fn get_agreement(&self, id: &str) -> Result<Agreement> {
        let table = self.agreements.read().map_err(|_| Self::lock_poisoned())?;
        table.get(id).cloned().ok_or(StorageError::NotFound {
            entity: "agreement",
            id: id.to_string(),
        })
    }

    async fn get_agreements_by_state(
        &self,
        states: &[AgreementState],
    ) -> Result<Vec<Agreement>> {
        let table = self.agreements.read().map_err(|_| Self::lock_poisoned())?;
        let mut result: Vec<Agreement> = table
            .values()
            .filter(|a| states.contains(&a.state))
            .cloned()
            .collect();
        // deterministic assessment order across ticks
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn create_agreement(&self, agreement: &Agreement) -> Result<Agreement> {
        let mut table = self.agreements.write().map_err(|_| Self::lock_poisoned())?;
        if table.contains_key(&agreement.id) {
            return Err(StorageError::AlreadyExists {
                entity: "agreement",
                id: agreement.id.clone(),
            });
        }
        table.insert(agreement.id.clone(), agreement.clone());
        Ok(agreement.clone())
    }

    async fn update_agreement(&self, agreement: &Agreement) -> Result<Agreement> {
        let mut table = self.agreements.write().map_err(|_| Self::lock_poisoned())?;
        if !table.contains_key(&agreement.id) {
            return Err(StorageError::NotFound {
                entity: "agreement",
                id: agreement.id.clone(),
            });
        }
        table.insert(agreement.id.clone(), agreement.clone());
        Ok(agreement.clone())
    }
}
