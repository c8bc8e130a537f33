use thiserror::Error;

/// Failure channel for every access-service operation. The remote
/// store's raw cause is preserved as text for diagnostics; nothing is
/// retried at this layer.
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),
}
