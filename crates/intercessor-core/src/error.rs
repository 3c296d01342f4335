//! Top-level error type for intercessor-core.
//!
//! Module-specific failures keep their own enums close to the code that
//! raises them; this aggregates them for callers that funnel everything
//! through one error path.

use crate::lifecycle::{DeleteError, FulfillError};
use crate::store::StoreError;
use thiserror::Error;

/// Core error type for intercessor-core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage-level failure outside a lifecycle transition.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A fulfill transition failed or was interrupted.
    #[error("fulfill error: {0}")]
    Fulfill(#[from] FulfillError),

    /// A delete left one or both stores unconfirmed.
    #[error("delete error: {0}")]
    Delete(#[from] DeleteError),

    /// Serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
