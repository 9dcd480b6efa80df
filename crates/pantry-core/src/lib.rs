//! # pantry-core: Pure Business Logic for Pantry
//!
//! The heart of the Pantry food-inventory and surplus-sharing system.
//! Everything in this crate is deterministic and I/O-free: entity types,
//! the fixed-point [`Quantity`] type, input validation, and pure
//! consumption analytics.
//!
//! ## Architecture Position
//! ```text
//! pantry-service  (InventoryLedger, SharingExchange)
//!        │
//!        ▼
//! pantry-core     (THIS CRATE - types, validation, analytics)
//!        ▲
//!        │
//! pantry-db       (SQLite repositories)
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Inventory, InventoryItem, FoodListing, ...)
//! - [`quantity`] - Fixed-point quantity arithmetic (no floating point!)
//! - [`error`] - Validation error types
//! - [`validation`] - Input validation rules
//! - [`analytics`] - Pure consumption aggregation
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output
//! 2. **No I/O**: database, network, file system access is forbidden here
//! 3. **Fixed-point quantities**: all quantities are integer milliunits
//! 4. **Explicit errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod error;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Reserved prefix for client-generated placeholder item ids.
///
/// A consumption request may reference an item the client has not persisted
/// yet; such ids carry this prefix and are treated as absent (the resulting
/// consumption log stores a null item reference, no lookup is attempted).
pub const TEMP_ITEM_ID_PREFIX: &str = "temp-";

/// The "expiring soon" window, in days: now through now + 7 inclusive.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 7;

/// Maximum length of user-supplied names and titles.
pub const MAX_NAME_LEN: usize = 120;

/// Maximum length of a free-text search query.
pub const MAX_SEARCH_LEN: usize = 100;
