//! # Catalog Repository
//!
//! Read access to the central food catalog.
//!
//! The core treats the catalog as read-only except for name lookups; the
//! case-insensitive match here backs the custom-name de-duplication rule
//! (adding "apple" rebinds to the catalog's "Apple").

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use pantry_core::FoodItem;

const FOOD_ITEM_COLUMNS: &str = r#"
    id, name, category, unit, shelf_life_days, cost_per_unit_cents,
    description, is_deleted, deleted_at, created_at, updated_at
"#;

/// Repository for catalog food items.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Inserts a catalog entry (seeding and tests; catalog management is
    /// not part of the core).
    pub async fn insert(&self, item: &FoodItem) -> DbResult<()> {
        debug!(id = %item.id, name = %item.name, "inserting catalog item");

        sqlx::query(
            r#"
            INSERT INTO food_items (
                id, name, category, unit, shelf_life_days, cost_per_unit_cents,
                description, is_deleted, deleted_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.unit)
        .bind(item.shelf_life_days)
        .bind(item.cost_per_unit_cents)
        .bind(&item.description)
        .bind(item.is_deleted)
        .bind(item.deleted_at)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an active (non-deleted) catalog entry by id.
    pub async fn get_active(&self, id: &str) -> DbResult<Option<FoodItem>> {
        let item = sqlx::query_as::<_, FoodItem>(&format!(
            "SELECT {FOOD_ITEM_COLUMNS} FROM food_items WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Finds an active catalog entry by case-insensitive name.
    ///
    /// Returns the first match in name order when the catalog carries
    /// duplicate names (it shouldn't, but the lookup stays deterministic).
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<FoodItem>> {
        let item = sqlx::query_as::<_, FoodItem>(&format!(
            r#"
            SELECT {FOOD_ITEM_COLUMNS}
            FROM food_items
            WHERE name = ?1 COLLATE NOCASE AND is_deleted = 0
            ORDER BY name
            LIMIT 1
            "#
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

}

// =============================================================================
// Unit Tests
// =============================================================================
