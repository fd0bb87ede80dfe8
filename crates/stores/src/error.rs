//! Store error types.

use thiserror::Error;

/// Errors surfaced by the store capabilities.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
