//! # Inventory Item Repository
//!
//! CRUD and filtered listing for inventory items.
//!
//! Two visibility rules live here and nowhere else:
//! - `is_deleted = 0` on every query (`removed` items stay fetchable by id
//!   so a consume attempt against an exhausted item can fail with context);
//! - `removed = 0` additionally on the active listing used by views.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::{InventoryItem, InventoryItemDetail};

const ITEM_COLUMNS: &str = r#"
    id, inventory_id, food_item_id, custom_name, quantity, unit,
    expiry_date, notes, removed, is_deleted, deleted_at, added_by,
    created_at, updated_at
"#;

const ITEM_DETAIL_COLUMNS: &str = r#"
    i.id, i.inventory_id, i.food_item_id, i.custom_name, i.quantity, i.unit,
    i.expiry_date, i.notes, i.removed, i.is_deleted, i.deleted_at, i.added_by,
    i.created_at, i.updated_at,
    f.name AS catalog_name, f.category AS catalog_category, f.unit AS catalog_unit
"#;

/// Repository for inventory items.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts an inventory item.
    pub async fn insert(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, inventory = %item.inventory_id, "inserting inventory item");

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, inventory_id, food_item_id, custom_name, quantity, unit,
                expiry_date, notes, removed, is_deleted, deleted_at, added_by,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&item.id)
        .bind(&item.inventory_id)
        .bind(&item.food_item_id)
        .bind(&item.custom_name)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.expiry_date)
        .bind(&item.notes)
        .bind(item.removed)
        .bind(item.is_deleted)
        .bind(item.deleted_at)
        .bind(&item.added_by)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a non-deleted item inside the given inventory.
    ///
    /// Removed (exhausted) items are returned; the caller decides whether
    /// a zero-quantity item is acceptable for its operation.
    pub async fn get_in_inventory(
        &self,
        id: &str,
        inventory_id: &str,
    ) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM inventory_items
            WHERE id = ?1 AND inventory_id = ?2 AND is_deleted = 0
            "#
        ))
        .bind(id)
        .bind(inventory_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a non-deleted item by id, regardless of inventory.
    pub async fn get(&self, id: &str) -> DbResult<Option<InventoryItem>> {
        let item = sqlx::query_as::<_, InventoryItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_items WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Gets a non-deleted item with catalog details joined in.
    pub async fn get_detail(&self, id: &str) -> DbResult<Option<InventoryItemDetail>> {
        let item = sqlx::query_as::<_, InventoryItemDetail>(&format!(
            r#"
            SELECT {ITEM_DETAIL_COLUMNS}
            FROM inventory_items i
            LEFT JOIN food_items f ON f.id = i.food_item_id AND f.is_deleted = 0
            WHERE i.id = ?1 AND i.is_deleted = 0
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Lists active items (not deleted, not removed) in an inventory.
    ///
    /// ## Arguments
    /// * `category` - optional catalog-category match
    /// * `expiring` - optional inclusive expiry window (from, to); items
    ///   without an expiry date never match a window
    pub async fn list_active(
        &self,
        inventory_id: &str,
        category: Option<&str>,
        expiring: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> DbResult<Vec<InventoryItemDetail>> {
        let (expires_from, expires_to) = match expiring {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let items = sqlx::query_as::<_, InventoryItemDetail>(&format!(
            r#"
            SELECT {ITEM_DETAIL_COLUMNS}
            FROM inventory_items i
            LEFT JOIN food_items f ON f.id = i.food_item_id AND f.is_deleted = 0
            WHERE i.inventory_id = ?1
              AND i.is_deleted = 0
              AND i.removed = 0
              AND (?2 IS NULL OR f.category = ?2)
              AND (?3 IS NULL OR (
                    i.expiry_date IS NOT NULL
                    AND i.expiry_date >= ?3
                    AND i.expiry_date <= ?4))
            ORDER BY i.expiry_date IS NULL, i.expiry_date, i.created_at
            "#
        ))
        .bind(inventory_id)
        .bind(category)
        .bind(expires_from)
        .bind(expires_to)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            inventory = %inventory_id,
            count = items.len(),
            "listed active items"
        );
        Ok(items)
    }

    /// Updates the mutable fields of an item.
    pub async fn update(&self, item: &InventoryItem) -> DbResult<()> {
        debug!(id = %item.id, "updating inventory item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                quantity = ?2,
                unit = ?3,
                expiry_date = ?4,
                notes = ?5,
                removed = ?6,
                updated_at = ?7
            WHERE id = ?1 AND is_deleted = 0
            "#,
        )
        .bind(&item.id)
        .bind(item.quantity)
        .bind(&item.unit)
        .bind(item.expiry_date)
        .bind(&item.notes)
        .bind(item.removed)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InventoryItem", &item.id));
        }

        Ok(())
    }

    /// Soft-deletes an item inside the given inventory.
    ///
    /// Returns false when no live row matched.
    pub async fn soft_delete(&self, id: &str, inventory_id: &str) -> DbResult<bool> {
        debug!(id = %id, "soft-deleting inventory item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                is_deleted = 1,
                deleted_at = ?3,
                updated_at = ?3
            WHERE id = ?1 AND inventory_id = ?2 AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(inventory_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
