//! # pantry-service: The Pantry Core State Machines
//!
//! The public call surface of the Pantry food-inventory and surplus-sharing
//! core. Two cooperating services:
//!
//! - [`InventoryLedger`] - inventories, items, the quantity lifecycle, and
//!   consumption logging
//! - [`SharingExchange`] - listings, claims, and completion
//!
//! The ledger has no dependency on the exchange; the exchange reads item
//! quantity/unit through the shared database handle when a listing is
//! created.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pantry_db::{Database, DbConfig};
//! use pantry_service::{InventoryLedger, SharingExchange};
//!
//! let db = Database::new(DbConfig::new("pantry.db")).await?;
//! let ledger = InventoryLedger::new(db.clone());
//! let exchange = SharingExchange::new(db);
//!
//! let inventory = ledger.create_inventory(&owner, NewInventory {
//!     name: "Kitchen".into(),
//!     ..Default::default()
//! }).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod exchange;
pub mod ledger;

#[cfg(test)]
mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ServiceError, ServiceResult};
pub use exchange::SharingExchange;
pub use ledger::InventoryLedger;
