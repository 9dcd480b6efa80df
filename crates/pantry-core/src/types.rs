//! # Domain Types
//!
//! Core domain types used throughout Pantry.
//!
//! ## Entity Map
//! ```text
//! User ──owns──► Inventory ──holds──► InventoryItem ──consumed via──► ConsumptionLog
//!                                          │
//!                                          └──offered via──► FoodListing ──claimed via──► SharingLog
//!
//! FoodItem (catalog) is referenced by InventoryItem and ConsumptionLog.
//! ```
//!
//! ## Dual-Identity Pattern
//! An `InventoryItem` is backed EITHER by a catalog `FoodItem` (by id) or by
//! a free-text `custom_name`. Adding a custom item whose name matches the
//! catalog case-insensitively silently rebinds it to the catalog entry.
//!
//! ## Soft Delete
//! Every entity carries `is_deleted`/`deleted_at`; rows are never physically
//! removed. Items additionally carry `removed`, which means "quantity fell
//! to zero through consumption" - a distinct, non-deleted, hidden state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quantity::Quantity;

// =============================================================================
// Status Enums
// =============================================================================

/// The status of a food listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Offer is open; anyone but the lister may claim it.
    Available,
    /// A claim exists; awaiting handover.
    Claimed,
    /// Handover happened. Terminal.
    Completed,
    /// Withdrawn by the lister before any claim. Terminal.
    Cancelled,
}

impl ListingStatus {
    /// Terminal states admit no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ListingStatus::Completed | ListingStatus::Cancelled)
    }
}

impl Default for ListingStatus {
    fn default() -> Self {
        ListingStatus::Available
    }
}

/// The status of a claim against a listing.
///
/// One typed enum shared by the claim lifecycle; kept in lockstep with
/// [`ListingStatus`] by the exchange's `complete` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    /// Claim placed, not yet fulfilled.
    Claimed,
    /// Fulfilled together with the listing.
    Completed,
}

impl Default for ClaimStatus {
    fn default() -> Self {
        ClaimStatus::Claimed
    }
}

/// Lifecycle state of an inventory item's quantity.
///
/// Derived from the `quantity`/`removed`/`is_deleted` fields rather than
/// stored; see [`InventoryItem::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    /// Quantity above zero; consumable, listable.
    Active,
    /// Quantity hit exactly zero through consumption. Hidden from active
    /// views; further consumption fails.
    Exhausted,
    /// Explicitly deleted by the user. Terminal.
    Deleted,
}

// =============================================================================
// Users
// =============================================================================

/// An internal user record.
///
/// Authentication happens outside the core; this is the resolver target for
/// external auth subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// External auth subject this user maps to (unique).
    pub subject: String,
    /// Display name.
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A catalog food item: a centrally maintained reference entity.
///
/// Read-only from the core's perspective except for name-matching lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FoodItem {
    pub id: String,
    /// Canonical name; custom items matching it case-insensitively are
    /// rebound to this entry.
    pub name: String,
    pub category: String,
    /// Default unit for items backed by this entry.
    pub unit: String,
    /// Typical shelf life in days, if known.
    pub shelf_life_days: Option<i64>,
    /// Cost per unit in cents (smallest currency unit).
    pub cost_per_unit_cents: Option<i64>,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Inventories
// =============================================================================

/// A named collection of items owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Inventory {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Private inventories are invisible to other users. Defaults to true.
    pub is_private: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A quantity of food inside an inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: String,
    pub inventory_id: String,
    /// Catalog backing, if any.
    pub food_item_id: Option<String>,
    /// Free-text name; holds the catalog's canonical name after rebinding.
    pub custom_name: Option<String>,
    /// Remaining quantity in milliunits. Never negative.
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    /// Quantity fell to zero through consumption (hidden, not deleted).
    pub removed: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    /// User who added the item.
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Derives the quantity-lifecycle state.
    pub fn state(&self) -> ItemState {
        if self.is_deleted {
            ItemState::Deleted
        } else if self.removed {
            ItemState::Exhausted
        } else {
            ItemState::Active
        }
    }
}

/// An inventory item with its catalog details joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItemDetail {
    pub id: String,
    pub inventory_id: String,
    pub food_item_id: Option<String>,
    pub custom_name: Option<String>,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub removed: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub added_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Catalog name, when the item is catalog-backed.
    pub catalog_name: Option<String>,
    /// Catalog category, when catalog-backed.
    pub catalog_category: Option<String>,
    /// Catalog default unit, when catalog-backed.
    pub catalog_unit: Option<String>,
}

impl InventoryItemDetail {
    /// The name shown for this item: catalog name, then custom name.
    pub fn display_name(&self) -> &str {
        self.catalog_name
            .as_deref()
            .or(self.custom_name.as_deref())
            .unwrap_or("")
    }

    /// The effective unit: the item's own unit, then the catalog default.
    pub fn effective_unit(&self) -> Option<&str> {
        self.unit.as_deref().or(self.catalog_unit.as_deref())
    }
}

// =============================================================================
// Consumption
// =============================================================================

/// An immutable record of one consumption event.
///
/// Uses the snapshot pattern: `item_name` (and unit) are frozen at
/// consumption time so history survives later item deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ConsumptionLog {
    pub id: String,
    pub inventory_id: String,
    /// Null when the consumed item was a client-side placeholder.
    pub inventory_item_id: Option<String>,
    pub food_item_id: Option<String>,
    /// Name snapshot at consumption time.
    pub item_name: String,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub consumed_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful consumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionReceipt {
    /// The log that was recorded.
    pub log: ConsumptionLog,
    /// Quantity left on the item, when a real item row was decremented.
    pub remaining: Option<Quantity>,
    /// True when this consumption drove the item to exactly zero.
    pub exhausted: bool,
}

// =============================================================================
// Sharing
// =============================================================================

/// An offer to share an inventory item's remaining quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FoodListing {
    pub id: String,
    pub inventory_item_id: String,
    pub lister_id: String,
    pub title: String,
    pub description: Option<String>,
    pub quantity: Quantity,
    /// Copied from the source item at creation; never caller-supplied.
    pub unit: Option<String>,
    pub pickup_location: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
    pub status: ListingStatus,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One claim against a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SharingLog {
    pub id: String,
    pub listing_id: String,
    /// Null for anonymous claims (identified by `claimer_name` only).
    pub claimer_id: Option<String>,
    pub claimer_name: Option<String>,
    pub quantity_claimed: Quantity,
    pub status: ClaimStatus,
    pub notes: Option<String>,
    pub claimed_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Request Types
// =============================================================================

/// Input for creating an inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventory {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to true when omitted.
    pub is_private: Option<bool>,
}

/// Partial update for an inventory. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_private: Option<bool>,
}

/// Input for adding an item to an inventory.
///
/// Exactly one of `food_item_id` / `custom_name` must be provided.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub food_item_id: Option<String>,
    pub custom_name: Option<String>,
    pub quantity: Quantity,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Partial update for an inventory item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub quantity: Option<Quantity>,
    pub unit: Option<String>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Input for recording a consumption event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeRequest {
    pub inventory_id: String,
    /// May carry the reserved `temp-` prefix for unpersisted placeholders.
    pub inventory_item_id: Option<String>,
    pub food_item_id: Option<String>,
    /// Name snapshot; required.
    pub item_name: String,
    pub quantity: Quantity,
    pub unit: Option<String>,
    /// Defaults to now.
    pub consumed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Input for creating a listing from an inventory item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewListing {
    pub inventory_item_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to the item's current quantity.
    pub quantity: Option<Quantity>,
    pub pickup_location: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
}

/// Input for claiming a listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// Display name for anonymous claimers.
    pub claimer_name: Option<String>,
    pub notes: Option<String>,
    /// Defaults to the listing's full quantity.
    pub quantity_claimed: Option<Quantity>,
}

/// Partial update for a listing. `None` fields are left unchanged.
///
/// `status` is patchable with no transition guard; the lister-only update
/// path writes whatever it is given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<Quantity>,
    pub pickup_location: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
    pub status: Option<ListingStatus>,
}

// =============================================================================
// Filter Types
// =============================================================================

/// Filters for listing inventory items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilter {
    /// Catalog category to match.
    pub category: Option<String>,
    /// Restrict to items expiring between now and now + 7 days inclusive.
    pub expiring_soon: bool,
}

/// Filters for consumption-log queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Scoping to an inventory the caller does not own yields an empty
    /// result, not an error.
    pub inventory_id: Option<String>,
}

/// Filters for browsing listings. All supplied filters AND together;
/// `search` ORs across title, description, custom name, and catalog name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilter {
    /// Defaults to `Available` when unspecified.
    pub status: Option<ListingStatus>,
    /// Substring match on pickup location.
    pub location: Option<String>,
    /// Catalog category of the underlying item.
    pub category: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
    /// Hide the requesting user's own listings.
    pub exclude_own_listings: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================
