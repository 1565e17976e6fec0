use thiserror::Error;

/// Result type for generator and estimator operations.
pub type EkgResult<T> = Result<T, EkgError>;

/// Errors exposed by the core.
///
/// Both core operations are total for valid inputs; the only failure is an
/// invalid argument rejected at the call boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EkgError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl EkgError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EkgError::InvalidArgument(message.into())
    }
}
