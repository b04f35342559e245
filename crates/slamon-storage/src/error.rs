/// Errors that can occur within the agreement repository.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A required record was not found in the repository.
    #[error("Storage: {entity} not found (id={id})")]
    NotFound { entity: &'static str, id: String },

    /// An insert collided with an existing record.
    #[error("Storage: {entity} already exists (id={id})")]
    AlreadyExists { entity: &'static str, id: String },

    /// Generic storage error for cases not covered by other variants.
    #[error("Storage: {0}")]
    Other(String),
}

/// Convenience `Result` alias for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;
