//! Error taxonomy for the content service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Service-level errors.
///
/// `NotFound` surfaces to callers as a client error. `BackendUnavailable`
/// and `ProfileUnavailable` are recoverable: the pipeline absorbs them and
/// degrades to base content instead of failing the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("patient profile unavailable: {0}")]
    ProfileUnavailable(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Whether the pipeline may absorb this error and return a degraded
    /// response instead of propagating it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ServiceError::BackendUnavailable(_) | ServiceError::ProfileUnavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(ServiceError::BackendUnavailable("down".into()).is_recoverable());
        assert!(ServiceError::ProfileUnavailable("missing".into()).is_recoverable());
        assert!(!ServiceError::NotFound("week 41".into()).is_recoverable());
        assert!(!ServiceError::Internal("boom".into()).is_recoverable());
    }
}
