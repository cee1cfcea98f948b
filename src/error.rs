use thiserror::Error;

// ---------------------------------------------------------------------------
// Console input errors
// ---------------------------------------------------------------------------

/// Errors raised while reading and validating interactive input.
///
/// The `Unknown*` variants are recoverable: the prompt loop shows a retry
/// message and asks again. `Closed` and `Io` end the session.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("unknown month '{0}'")]
    UnknownMonth(String),

    #[error("unknown day of week '{0}'")]
    UnknownDay(String),

    #[error("input closed before a valid answer was given")]
    Closed,

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl InputError {
    /// Whether the prompt should simply be asked again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InputError::UnknownCity(_) | InputError::UnknownMonth(_) | InputError::UnknownDay(_)
        )
    }
}
