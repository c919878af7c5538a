//! Error types for the client composition root

use thiserror::Error;

use huesync_remote::{ApiError, PushError};

/// Errors that can occur while starting the sync client
#[derive(Debug, Error)]
pub enum SyncError {
    /// The persistence adapter could not be constructed
    #[error("persistence adapter error: {0}")]
    Api(#[from] ApiError),

    /// The push channel could not be opened
    #[error("push channel error: {0}")]
    Push(#[from] PushError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: SyncError = ApiError::Status(500).into();
        assert!(matches!(err, SyncError::Api(_)));

        let err: SyncError = PushError::AlreadyOpen.into();
        assert!(matches!(err, SyncError::Push(_)));
    }
}
