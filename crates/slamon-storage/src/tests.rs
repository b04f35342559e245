use crate::error::StorageError;
use crate::memory::MemRepository;
use crate::Repository;
use chrono::{TimeZone, Utc};
use slamon_common::types::*;

fn make_agreement(id: &str, state: AgreementState) -> Agreement {
    Agreement {
        id: id.to_string(),
        name: format!("agreement {id}"),
        state,
        details: Details {
            id: id.to_string(),
            name: format!("agreement {id}"),
            client: Client::default(),
            creation: Utc.timestamp_opt(0, 0).unwrap(),
            expiration: None,
            variables: vec![],
            guarantees: vec![],
        },
        assessment: Assessment::default(),
    }
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let repo = MemRepository::new();
    let a = make_agreement("a-01", AgreementState::Started);

    repo.create_agreement(&a).await.unwrap();
    let loaded = repo.get_agreement("a-01").await.unwrap();
    assert_eq!(loaded, a);

    let err = repo.get_agreement("a-99").await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}

#[tokio::test]
async fn create_rejects_duplicate_ids() {
    let repo = MemRepository::new();
    let a = make_agreement("a-01", AgreementState::Started);
    repo.create_agreement(&a).await.unwrap();

    let err = repo.create_agreement(&a).await.unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists { .. }));
}

#[tokio::test]
async fn listing_filters_by_state_in_id_order() {
    let repo = MemRepository::new();
    repo.create_agreement(&make_agreement("a-02", AgreementState::Stopped))
        .await
        .unwrap();
    repo.create_agreement(&make_agreement("a-01", AgreementState::Started))
        .await
        .unwrap();
    repo.create_agreement(&make_agreement("a-03", AgreementState::Terminated))
        .await
        .unwrap();

    let active = repo
        .get_agreements_by_state(&[AgreementState::Started, AgreementState::Stopped])
        .await
        .unwrap();
    let ids: Vec<&str> = active.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a-01", "a-02"]);
}

#[tokio::test]
async fn update_persists_assessment_changes() {
    let repo = MemRepository::new();
    let mut a = make_agreement("a-01", AgreementState::Started);
    repo.create_agreement(&a).await.unwrap();

    let now = Utc.timestamp_opt(100, 0).unwrap();
    a.assessment.first_execution = Some(now);
    a.assessment.last_execution = Some(now);
    repo.update_agreement(&a).await.unwrap();

    let loaded = repo.get_agreement("a-01").await.unwrap();
    assert_eq!(loaded.assessment.last_execution, Some(now));

    let ghost = make_agreement("a-99", AgreementState::Started);
    let err = repo.update_agreement(&ghost).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound { .. }));
}
