//! # Consumption Repository
//!
//! Append-only consumption logs plus the atomic consume path.
//!
//! ## Consume Atomicity
//! ```text
//! BEGIN
//!   UPDATE inventory_items
//!      SET quantity = quantity - :qty,
//!          removed  = CASE WHEN quantity = :qty THEN 1 ELSE removed END
//!    WHERE id = :item AND is_deleted = 0 AND quantity >= :qty
//!   -- rows_affected = 0  =>  missing item OR insufficient quantity
//!   INSERT INTO consumption_logs (...)
//! COMMIT
//! ```
//!
//! The `quantity >= :qty` guard plus the affected-row check is the
//! compare-and-swap that keeps two concurrent consumers from jointly
//! overdrawing one item: whichever transaction runs second re-evaluates
//! the guard against the committed quantity, not a stale read.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use pantry_core::{ConsumptionLog, Quantity};

const LOG_COLUMNS: &str = r#"
    id, inventory_id, inventory_item_id, food_item_id, item_name, quantity,
    unit, consumed_at, notes, is_deleted, deleted_at, created_at
"#;

/// Outcome of an atomic consume attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Log written; item decremented when one was referenced.
    Recorded {
        /// Quantity left on the item (None for placeholder consumptions).
        remaining: Option<Quantity>,
        /// True when this consumption drove the item to exactly zero.
        exhausted: bool,
    },
    /// The referenced item does not exist (or is deleted) in the inventory.
    ItemMissing,
    /// The item holds less than the requested quantity. Nothing written.
    Insufficient { available: Quantity },
}

/// Repository for consumption logs.
#[derive(Debug, Clone)]
pub struct ConsumptionRepository {
    pool: SqlitePool,
}

impl ConsumptionRepository {
    /// Creates a new ConsumptionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ConsumptionRepository { pool }
    }

    /// Records a consumption event atomically.
    ///
    /// When the log references a real item, the conditional decrement and
    /// the log insert commit together or not at all. A log without an item
    /// reference (client-side placeholder) is a plain insert.
    pub async fn record(&self, log: &ConsumptionLog) -> DbResult<ConsumeOutcome> {
        debug!(
            inventory = %log.inventory_id,
            item = ?log.inventory_item_id,
            quantity = %log.quantity,
            "recording consumption"
        );

        let mut tx = self.pool.begin().await?;

        let mut remaining = None;
        let mut exhausted = false;

        if let Some(item_id) = &log.inventory_item_id {
            let result = sqlx::query(
                r#"
                UPDATE inventory_items SET
                    quantity = quantity - ?3,
                    removed = CASE WHEN quantity = ?3 THEN 1 ELSE removed END,
                    updated_at = ?4
                WHERE id = ?1 AND inventory_id = ?2 AND is_deleted = 0 AND quantity >= ?3
                "#,
            )
            .bind(item_id)
            .bind(&log.inventory_id)
            .bind(log.quantity)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Guard failed: tell missing and insufficient apart, then
                // drop the transaction (rollback) without writing anything.
                let available: Option<Quantity> = sqlx::query_scalar(
                    r#"
                    SELECT quantity FROM inventory_items
                    WHERE id = ?1 AND inventory_id = ?2 AND is_deleted = 0
                    "#,
                )
                .bind(item_id)
                .bind(&log.inventory_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Ok(match available {
                    None => ConsumeOutcome::ItemMissing,
                    Some(available) => ConsumeOutcome::Insufficient { available },
                });
            }

            let left: Quantity = sqlx::query_scalar(
                "SELECT quantity FROM inventory_items WHERE id = ?1",
            )
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

            exhausted = left.is_zero();
            remaining = Some(left);
        }

        sqlx::query(
            r#"
            INSERT INTO consumption_logs (
                id, inventory_id, inventory_item_id, food_item_id, item_name,
                quantity, unit, consumed_at, notes, is_deleted, deleted_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&log.id)
        .bind(&log.inventory_id)
        .bind(&log.inventory_item_id)
        .bind(&log.food_item_id)
        .bind(&log.item_name)
        .bind(log.quantity)
        .bind(&log.unit)
        .bind(log.consumed_at)
        .bind(&log.notes)
        .bind(log.is_deleted)
        .bind(log.deleted_at)
        .bind(log.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if exhausted {
            info!(item = ?log.inventory_item_id, "item exhausted by consumption");
        }

        Ok(ConsumeOutcome::Recorded {
            remaining,
            exhausted,
        })
    }

    /// Lists non-deleted logs for inventories owned by the given user,
    /// newest first.
    ///
    /// The owner predicate is part of the SQL: scoping to an inventory the
    /// user does not own simply matches nothing. That fail-soft shape is
    /// relied upon by the service layer.
    pub async fn list_for_owner(
        &self,
        owner_id: &str,
        inventory_id: Option<&str>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DbResult<Vec<ConsumptionLog>> {
        let logs = sqlx::query_as::<_, ConsumptionLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS}
            FROM consumption_logs
            WHERE is_deleted = 0
              AND inventory_id IN (
                    SELECT id FROM inventories
                    WHERE owner_id = ?1 AND is_deleted = 0)
              AND (?2 IS NULL OR inventory_id = ?2)
              AND (?3 IS NULL OR consumed_at >= ?3)
              AND (?4 IS NULL OR consumed_at <= ?4)
            ORDER BY consumed_at DESC
            "#
        ))
        .bind(owner_id)
        .bind(inventory_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
