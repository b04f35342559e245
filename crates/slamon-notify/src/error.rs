/// Errors that can occur while constructing or running notifiers.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Notifier configuration is missing a required field or contains an
    /// invalid value.
    #[error("Notify: invalid notifier configuration: {0}")]
    InvalidConfig(String),

    /// The notifier type is not registered in the plugin registry.
    #[error("Notify: unknown notifier type '{0}'")]
    UnknownNotifierType(String),

    /// An HTTP request to an external notification endpoint failed.
    #[error("Notify: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The external endpoint returned a non-success response.
    #[error("Notify: endpoint returned status={status}: {body}")]
    Endpoint { status: u16, body: String },

    /// JSON serialization of the violation report failed.
    #[error("Notify: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience `Result` alias for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
