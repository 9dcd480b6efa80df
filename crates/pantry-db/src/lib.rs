//! # pantry-db: Database Layer for Pantry
//!
//! SQLite persistence for the Pantry inventory and sharing core, built on
//! sqlx with embedded migrations.
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (one per aggregate)
//!
//! ## Soft-Delete Invariant
//!
//! Rows are never physically deleted. Every query the repositories expose
//! filters `is_deleted = 0` (and, for active item listings, `removed = 0`)
//! in the SQL itself - call sites never re-apply the predicate, so an
//! omitted filter cannot leak dead rows.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("pantry.db")).await?;
//! let user = db.users().resolve_subject("auth0|abc123").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::catalog::CatalogRepository;
pub use repository::consumption::{ConsumeOutcome, ConsumptionRepository};
pub use repository::inventory::InventoryRepository;
pub use repository::item::ItemRepository;
pub use repository::listing::{CancelOutcome, ClaimOutcome, ListingRepository};
pub use repository::users::UserRepository;
