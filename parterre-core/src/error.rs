use thiserror::Error;

/// Storage-layer failures.
///
/// `UniqueViolation` is its own variant because the locking protocol
/// arbitrates races through the store's composite keys: a violated key is a
/// lost race to report as a conflict, not an internal error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,

    #[error("database error: {0}")]
    Backend(String),
}
