//! # Inventory Ledger
//!
//! Owns the Inventory -> InventoryItem -> ConsumptionLog lifecycle.
//!
//! ## Quantity State Machine
//! ```text
//! ACTIVE (quantity > 0)
//!    │  partial consume / update        full consume
//!    ├───────────────► ACTIVE    ├───────────────► EXHAUSTED (quantity = 0, removed)
//!    │                                                  │
//!    └──────────── explicit delete ────────────────────┴──► DELETED (terminal)
//! ```
//!
//! EXHAUSTED is terminal for consumption: the quantity is already zero, so
//! any further consume fails with `InsufficientQuantity`.
//!
//! Every operation takes the calling owner's id; an ownership miss reads
//! as `NotFound`. The consumption-log query is the one deliberate
//! exception - it fail-softs to an empty result (see
//! [`InventoryLedger::consumption_logs`]).

use chrono::{Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use pantry_core::analytics::{summarize, ConsumptionSummary};
use pantry_core::validation::{is_temp_item_id, validate_name, validate_quantity};
use pantry_core::{
    ConsumeRequest, ConsumptionFilter, ConsumptionLog, ConsumptionReceipt, Inventory,
    InventoryItem, InventoryItemDetail, InventoryPatch, ItemFilter, ItemPatch, NewInventory,
    NewItem, ValidationError, EXPIRING_SOON_WINDOW_DAYS,
};
use pantry_db::{ConsumeOutcome, Database};

use crate::error::{ServiceError, ServiceResult};

/// The inventory ledger service.
///
/// Cheap to clone; all clones share one database pool.
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    db: Database,
}

impl InventoryLedger {
    /// Creates a ledger over the given database.
    pub fn new(db: Database) -> Self {
        InventoryLedger { db }
    }

    // =========================================================================
    // Inventories
    // =========================================================================

    /// Creates an inventory for the given owner.
    ///
    /// `is_private` defaults to true. Fails `NotFound` when the owner id
    /// does not resolve to a known user.
    pub async fn create_inventory(
        &self,
        owner_id: &str,
        input: NewInventory,
    ) -> ServiceResult<Inventory> {
        let name = validate_name("name", &input.name)?;

        let owner = self
            .db
            .users()
            .get_by_id(owner_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", owner_id))?;

        let now = Utc::now();
        let inventory = Inventory {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.id,
            name,
            description: input.description,
            is_private: input.is_private.unwrap_or(true),
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        self.db.inventories().insert(&inventory).await?;

        info!(inventory = %inventory.id, owner = %owner_id, "inventory created");
        Ok(inventory)
    }

    /// Lists the owner's active inventories.
    pub async fn list_inventories(&self, owner_id: &str) -> ServiceResult<Vec<Inventory>> {
        Ok(self.db.inventories().list_for_owner(owner_id).await?)
    }

    /// Updates an inventory. Owner only.
    pub async fn update_inventory(
        &self,
        owner_id: &str,
        inventory_id: &str,
        patch: InventoryPatch,
    ) -> ServiceResult<Inventory> {
        let mut inventory = self.owned_inventory(owner_id, inventory_id).await?;

        if let Some(name) = patch.name {
            inventory.name = validate_name("name", &name)?;
        }
        if let Some(description) = patch.description {
            inventory.description = Some(description);
        }
        if let Some(is_private) = patch.is_private {
            inventory.is_private = is_private;
        }

        self.db.inventories().update(&inventory).await?;

        self.owned_inventory(owner_id, inventory_id).await
    }

    /// Soft-deletes an inventory. Owner only.
    pub async fn delete_inventory(&self, owner_id: &str, inventory_id: &str) -> ServiceResult<()> {
        let deleted = self
            .db
            .inventories()
            .soft_delete(inventory_id, owner_id)
            .await?;

        if !deleted {
            return Err(ServiceError::not_found("Inventory", inventory_id));
        }

        info!(inventory = %inventory_id, "inventory deleted");
        Ok(())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Adds an item to an inventory, resolving catalog identity.
    ///
    /// Exactly one of `food_item_id` / `custom_name` must be supplied. A
    /// custom name matching an active catalog entry case-insensitively is
    /// silently rebound to that entry: the item takes the catalog's
    /// canonical name and, when the caller supplied no unit, the catalog's
    /// unit. A caller-supplied unit always wins.
    pub async fn add_item(
        &self,
        owner_id: &str,
        inventory_id: &str,
        input: NewItem,
    ) -> ServiceResult<InventoryItemDetail> {
        let inventory = self.owned_inventory(owner_id, inventory_id).await?;

        validate_quantity("quantity", input.quantity)?;

        let custom = input
            .custom_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let (food_item_id, custom_name, unit) = match (input.food_item_id.as_deref(), custom) {
            (Some(_), Some(_)) | (None, None) => {
                return Err(ValidationError::ExactlyOneOf {
                    first: "foodItemId".to_string(),
                    second: "customName".to_string(),
                }
                .into());
            }

            (Some(food_item_id), None) => {
                let catalog = self
                    .db
                    .catalog()
                    .get_active(food_item_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("FoodItem", food_item_id))?;

                (Some(catalog.id), None, input.unit.or(Some(catalog.unit)))
            }

            (None, Some(custom)) => {
                let custom = validate_name("customName", custom)?;

                match self.db.catalog().find_by_name(&custom).await? {
                    // De-duplication: rebind to the catalog entry, canonical
                    // casing, caller-supplied unit wins.
                    Some(catalog) => (
                        Some(catalog.id),
                        Some(catalog.name),
                        input.unit.or(Some(catalog.unit)),
                    ),
                    None => (None, Some(custom), input.unit),
                }
            }
        };

        let now = Utc::now();
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            inventory_id: inventory.id.clone(),
            food_item_id,
            custom_name,
            quantity: input.quantity,
            unit,
            expiry_date: input.expiry_date,
            notes: input.notes,
            removed: false,
            is_deleted: false,
            deleted_at: None,
            added_by: owner_id.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.db.items().insert(&item).await?;

        info!(item = %item.id, inventory = %inventory.id, "item added");

        self.db
            .items()
            .get_detail(&item.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("InventoryItem", &item.id))
    }

    /// Updates an item's mutable fields. Owner only.
    ///
    /// A manual quantity update must stay positive (a zero would bypass
    /// the consumption path that marks exhaustion); setting one reactivates
    /// a previously exhausted item.
    pub async fn update_item(
        &self,
        owner_id: &str,
        inventory_id: &str,
        item_id: &str,
        patch: ItemPatch,
    ) -> ServiceResult<InventoryItem> {
        let inventory = self.owned_inventory(owner_id, inventory_id).await?;

        let mut item = self
            .db
            .items()
            .get_in_inventory(item_id, &inventory.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("InventoryItem", item_id))?;

        if let Some(quantity) = patch.quantity {
            validate_quantity("quantity", quantity)?;
            item.quantity = quantity;
            item.removed = false;
        }
        if let Some(unit) = patch.unit {
            item.unit = Some(unit);
        }
        if let Some(expiry_date) = patch.expiry_date {
            item.expiry_date = Some(expiry_date);
        }
        if let Some(notes) = patch.notes {
            item.notes = Some(notes);
        }

        self.db.items().update(&item).await?;

        self.db
            .items()
            .get_in_inventory(item_id, &inventory.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("InventoryItem", item_id))
    }

    /// Soft-deletes an item. Owner only. Terminal.
    pub async fn remove_item(
        &self,
        owner_id: &str,
        inventory_id: &str,
        item_id: &str,
    ) -> ServiceResult<()> {
        let inventory = self.owned_inventory(owner_id, inventory_id).await?;

        let deleted = self.db.items().soft_delete(item_id, &inventory.id).await?;
        if !deleted {
            return Err(ServiceError::not_found("InventoryItem", item_id));
        }

        info!(item = %item_id, "item deleted");
        Ok(())
    }

    /// Lists active items (not deleted, not removed) with catalog details.
    ///
    /// `expiring_soon` restricts to items whose expiry date falls between
    /// now and now + 7 days inclusive.
    pub async fn list_items(
        &self,
        owner_id: &str,
        inventory_id: &str,
        filter: ItemFilter,
    ) -> ServiceResult<Vec<InventoryItemDetail>> {
        let inventory = self.owned_inventory(owner_id, inventory_id).await?;

        let expiring = filter.expiring_soon.then(|| {
            let now = Utc::now();
            (now, now + Duration::days(EXPIRING_SOON_WINDOW_DAYS))
        });

        Ok(self
            .db
            .items()
            .list_active(&inventory.id, filter.category.as_deref(), expiring)
            .await?)
    }

    // =========================================================================
    // Consumption
    // =========================================================================

    /// Records a consumption event, atomically decrementing the source
    /// item when one is referenced.
    ///
    /// An `inventory_item_id` carrying the reserved temporary prefix is a
    /// client-side placeholder: no lookup is attempted and the log stores
    /// a null item reference. A real id must resolve to a non-deleted item
    /// in the inventory. Consuming more than the available quantity fails
    /// `InsufficientQuantity` with nothing written; landing exactly on
    /// zero marks the item removed.
    pub async fn consume(
        &self,
        owner_id: &str,
        request: ConsumeRequest,
    ) -> ServiceResult<ConsumptionReceipt> {
        let item_name = validate_name("itemName", &request.item_name)?;
        validate_quantity("quantity", request.quantity)?;

        let inventory = self.owned_inventory(owner_id, &request.inventory_id).await?;

        let item_id = request
            .inventory_item_id
            .as_deref()
            .filter(|id| !is_temp_item_id(id))
            .map(str::to_string);

        let mut food_item_id = request.food_item_id;
        let mut unit = request.unit;

        if let Some(id) = &item_id {
            let item = self
                .db
                .items()
                .get_in_inventory(id, &inventory.id)
                .await?
                .ok_or_else(|| ServiceError::not_found("InventoryItem", id))?;

            // Keep the denormalized snapshot meaningful when the caller
            // omitted fields the item row knows.
            if food_item_id.is_none() {
                food_item_id = item.food_item_id;
            }
            if unit.is_none() {
                unit = item.unit;
            }
        }

        let now = Utc::now();
        let log = ConsumptionLog {
            id: Uuid::new_v4().to_string(),
            inventory_id: inventory.id.clone(),
            inventory_item_id: item_id,
            food_item_id,
            item_name,
            quantity: request.quantity,
            unit,
            consumed_at: request.consumed_at.unwrap_or(now),
            notes: request.notes,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
        };

        debug!(
            inventory = %log.inventory_id,
            item = ?log.inventory_item_id,
            quantity = %log.quantity,
            "consuming"
        );

        match self.db.consumption().record(&log).await? {
            ConsumeOutcome::Recorded {
                remaining,
                exhausted,
            } => {
                info!(
                    log = %log.id,
                    remaining = ?remaining,
                    exhausted,
                    "consumption recorded"
                );
                Ok(ConsumptionReceipt {
                    log,
                    remaining,
                    exhausted,
                })
            }
            ConsumeOutcome::ItemMissing => Err(ServiceError::not_found(
                "InventoryItem",
                log.inventory_item_id.unwrap_or_default(),
            )),
            ConsumeOutcome::Insufficient { available } => {
                Err(ServiceError::InsufficientQuantity {
                    name: log.item_name,
                    available,
                    requested: log.quantity,
                })
            }
        }
    }

    /// Lists consumption logs scoped to inventories the caller owns.
    ///
    /// Fail-soft by contract: scoping to an inventory the caller does not
    /// own yields an empty sequence, not an error, so this endpoint cannot
    /// be used to probe for other users' inventories.
    pub async fn consumption_logs(
        &self,
        owner_id: &str,
        filter: ConsumptionFilter,
    ) -> ServiceResult<Vec<ConsumptionLog>> {
        Ok(self
            .db
            .consumption()
            .list_for_owner(
                owner_id,
                filter.inventory_id.as_deref(),
                filter.start_date,
                filter.end_date,
            )
            .await?)
    }

    /// Aggregates the caller's consumption logs into a summary.
    pub async fn consumption_summary(
        &self,
        owner_id: &str,
        filter: ConsumptionFilter,
    ) -> ServiceResult<ConsumptionSummary> {
        let logs = self.consumption_logs(owner_id, filter).await?;
        Ok(summarize(&logs))
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Resolves an inventory owned by the caller, or `NotFound`.
    async fn owned_inventory(
        &self,
        owner_id: &str,
        inventory_id: &str,
    ) -> ServiceResult<Inventory> {
        self.db
            .inventories()
            .get_owned(inventory_id, owner_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Inventory", inventory_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
