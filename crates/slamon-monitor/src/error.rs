/// Errors that can occur while retrieving metrics from a backend.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// A request to the monitoring backend failed (network, timeout,
    /// non-success status). The assessment layer downgrades this to an
    /// empty tuple set for the affected guarantee.
    #[error("Monitor: backend request failed: {0}")]
    Transport(String),

    /// The backend answered with a payload the adapter could not interpret.
    #[error("Monitor: malformed backend response: {0}")]
    MalformedResponse(String),

    /// Generic monitoring error for cases not covered by other variants.
    #[error("Monitor: {0}")]
    Other(String),
}

/// Convenience `Result` alias for monitoring operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
