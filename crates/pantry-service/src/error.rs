//! # Service Error Types
//!
//! The caller-facing error taxonomy of the Pantry core.
//!
//! ## Taxonomy
//! ```text
//! Validation            caller input broke a precondition; fix and retry
//! NotFound              absent, soft-deleted, or not owned by the caller
//! Forbidden             caller identified but lacks the required role
//! Conflict              cross-entity invariant violated at this moment
//! InsufficientQuantity  consume would overdraw the item; nothing written
//! Internal              unexpected persistence failure; opaque to callers
//! ```
//!
//! Ownership misses surface as `NotFound`, not `Forbidden` - a caller
//! cannot distinguish "exists but isn't yours" from "doesn't exist".
//! The one deliberate exception is the consumption-log query, which
//! fail-softs to an empty result instead (see `InventoryLedger`).

use thiserror::Error;

use pantry_core::{Quantity, ValidationError};
use pantry_db::DbError;

/// Errors returned by the ledger and exchange services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller input violates a stated precondition.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced entity does not exist, is soft-deleted, or does not
    /// belong to the requesting owner.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Entity exists and the caller is identified, but lacks the role the
    /// operation requires.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Operation is individually valid but violates a cross-entity
    /// invariant right now.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Consuming more than the item's available quantity. Fatal; no
    /// partial consumption happens.
    #[error("insufficient quantity for {name}: available {available}, requested {requested}")]
    InsufficientQuantity {
        name: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Unexpected persistence failure, surfaced opaquely.
    #[error("internal error: {0}")]
    Internal(#[from] DbError),
}

impl ServiceError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ServiceError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Forbidden error.
    pub fn forbidden(reason: impl Into<String>) -> Self {
        ServiceError::Forbidden(reason.into())
    }

    /// Creates a Conflict error.
    pub fn conflict(reason: impl Into<String>) -> Self {
        ServiceError::Conflict(reason.into())
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
