//! # Inventory Repository
//!
//! CRUD for inventories. Ownership scoping happens in the SQL: lookups
//! take the owner id, and a miss is indistinguishable from absence.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use pantry_core::Inventory;

const INVENTORY_COLUMNS: &str = r#"
    id, owner_id, name, description, is_private,
    is_deleted, deleted_at, created_at, updated_at
"#;

/// Repository for inventories.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Inserts an inventory.
    pub async fn insert(&self, inventory: &Inventory) -> DbResult<()> {
        debug!(id = %inventory.id, owner = %inventory.owner_id, "inserting inventory");

        sqlx::query(
            r#"
            INSERT INTO inventories (
                id, owner_id, name, description, is_private,
                is_deleted, deleted_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&inventory.id)
        .bind(&inventory.owner_id)
        .bind(&inventory.name)
        .bind(&inventory.description)
        .bind(inventory.is_private)
        .bind(inventory.is_deleted)
        .bind(inventory.deleted_at)
        .bind(inventory.created_at)
        .bind(inventory.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a non-deleted inventory owned by the given user.
    pub async fn get_owned(&self, id: &str, owner_id: &str) -> DbResult<Option<Inventory>> {
        let inventory = sqlx::query_as::<_, Inventory>(&format!(
            r#"
            SELECT {INVENTORY_COLUMNS}
            FROM inventories
            WHERE id = ?1 AND owner_id = ?2 AND is_deleted = 0
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(inventory)
    }

    /// Lists the owner's non-deleted inventories, newest first.
    pub async fn list_for_owner(&self, owner_id: &str) -> DbResult<Vec<Inventory>> {
        let inventories = sqlx::query_as::<_, Inventory>(&format!(
            r#"
            SELECT {INVENTORY_COLUMNS}
            FROM inventories
            WHERE owner_id = ?1 AND is_deleted = 0
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(inventories)
    }

    /// Updates the mutable fields of an inventory.
    ///
    /// The row must still belong to the recorded owner and be non-deleted.
    pub async fn update(&self, inventory: &Inventory) -> DbResult<()> {
        debug!(id = %inventory.id, "updating inventory");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventories SET
                name = ?3,
                description = ?4,
                is_private = ?5,
                updated_at = ?6
            WHERE id = ?1 AND owner_id = ?2 AND is_deleted = 0
            "#,
        )
        .bind(&inventory.id)
        .bind(&inventory.owner_id)
        .bind(&inventory.name)
        .bind(&inventory.description)
        .bind(inventory.is_private)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Inventory", &inventory.id));
        }

        Ok(())
    }

    /// Soft-deletes an inventory owned by the given user.
    ///
    /// Returns false when no live row matched (absent, already deleted, or
    /// owned by someone else).
    pub async fn soft_delete(&self, id: &str, owner_id: &str) -> DbResult<bool> {
        debug!(id = %id, "soft-deleting inventory");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE inventories SET
                is_deleted = 1,
                deleted_at = ?3,
                updated_at = ?3
            WHERE id = ?1 AND owner_id = ?2 AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
