/// Errors that can occur while evaluating guarantee terms.
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    /// The guarantee's constraint string does not parse. Fatal for the
    /// whole agreement's evaluation this tick.
    #[error("Assess: cannot parse constraint '{constraint}': {source}")]
    ConstraintParse {
        constraint: String,
        #[source]
        source: evalexpr::EvalexprError,
    },

    /// A constraint failed to evaluate against one tuple (missing variable,
    /// type mismatch). Only that tuple is dropped.
    #[error("Assess: constraint '{constraint}' failed to evaluate: {source}")]
    Evaluation {
        constraint: String,
        #[source]
        source: evalexpr::EvalexprError,
    },
}

/// Convenience `Result` alias for assessment operations.
pub type Result<T> = std::result::Result<T, AssessError>;
