//! # Listing Repository
//!
//! Food-listing lifecycle and claims.
//!
//! ## Listing Lifecycle
//! ```text
//! AVAILABLE ──claim()────► CLAIMED ──complete()──► COMPLETED (terminal)
//!     │
//!     └──cancel()────► CANCELLED (terminal, soft-deleted)
//! ```
//!
//! Every transition is a conditional UPDATE guarded on the source status
//! with an affected-row check, so concurrent claimers (or a claim racing a
//! delete) serialize on the committed state instead of a stale read.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use pantry_core::{FoodListing, ListingStatus, SharingLog};

const LISTING_COLUMNS: &str = r#"
    l.id, l.inventory_item_id, l.lister_id, l.title, l.description,
    l.quantity, l.unit, l.pickup_location, l.available_until, l.status,
    l.is_deleted, l.deleted_at, l.created_at, l.updated_at
"#;

const SHARING_LOG_COLUMNS: &str = r#"
    id, listing_id, claimer_id, claimer_name, quantity_claimed, status,
    notes, claimed_at, completed_at, is_deleted, deleted_at
"#;

/// Outcome of an atomic claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Log written, listing flipped to CLAIMED.
    Claimed,
    /// Listing is absent, deleted, or no longer AVAILABLE.
    NotAvailable,
    /// The claimer already holds an active claim on this listing.
    AlreadyClaimedByUser,
}

/// Outcome of an atomic cancel (delete) attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    /// Listing soft-deleted with status forced to CANCELLED.
    Cancelled,
    /// At least one claim is still active; nothing changed.
    ActiveClaims,
    /// Listing is absent, deleted, or not AVAILABLE.
    NotAvailable,
}

/// Repository for food listings and sharing logs.
#[derive(Debug, Clone)]
pub struct ListingRepository {
    pool: SqlitePool,
}

impl ListingRepository {
    /// Creates a new ListingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ListingRepository { pool }
    }

    /// Inserts a listing unless an AVAILABLE one already exists for the
    /// same inventory item.
    ///
    /// Returns false (and writes nothing) on the duplicate case. The
    /// NOT EXISTS guard runs inside the INSERT statement itself, so two
    /// concurrent creations cannot both pass it.
    pub async fn insert_available(&self, listing: &FoodListing) -> DbResult<bool> {
        debug!(
            id = %listing.id,
            item = %listing.inventory_item_id,
            "inserting listing"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO food_listings (
                id, inventory_item_id, lister_id, title, description,
                quantity, unit, pickup_location, available_until, status,
                is_deleted, deleted_at, created_at, updated_at
            )
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14
            WHERE NOT EXISTS (
                SELECT 1 FROM food_listings
                WHERE inventory_item_id = ?2
                  AND status = 'available'
                  AND is_deleted = 0
            )
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.inventory_item_id)
        .bind(&listing.lister_id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.quantity)
        .bind(&listing.unit)
        .bind(&listing.pickup_location)
        .bind(listing.available_until)
        .bind(listing.status)
        .bind(listing.is_deleted)
        .bind(listing.deleted_at)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Gets a non-deleted listing by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<FoodListing>> {
        let listing = sqlx::query_as::<_, FoodListing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM food_listings l
            WHERE l.id = ?1 AND l.is_deleted = 0
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Claims a listing atomically: flips AVAILABLE to CLAIMED and writes
    /// the sharing log in one transaction.
    pub async fn claim(&self, log: &SharingLog) -> DbResult<ClaimOutcome> {
        debug!(
            listing = %log.listing_id,
            claimer = ?log.claimer_id,
            "claiming listing"
        );

        let mut tx = self.pool.begin().await?;

        if let Some(claimer_id) = &log.claimer_id {
            let already: i64 = sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM sharing_logs
                    WHERE listing_id = ?1
                      AND claimer_id = ?2
                      AND status = 'claimed'
                      AND is_deleted = 0
                )
                "#,
            )
            .bind(&log.listing_id)
            .bind(claimer_id)
            .fetch_one(&mut *tx)
            .await?;

            if already != 0 {
                return Ok(ClaimOutcome::AlreadyClaimedByUser);
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE food_listings SET
                status = 'claimed',
                updated_at = ?2
            WHERE id = ?1 AND status = 'available' AND is_deleted = 0
            "#,
        )
        .bind(&log.listing_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(ClaimOutcome::NotAvailable);
        }

        sqlx::query(
            r#"
            INSERT INTO sharing_logs (
                id, listing_id, claimer_id, claimer_name, quantity_claimed,
                status, notes, claimed_at, completed_at, is_deleted, deleted_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&log.id)
        .bind(&log.listing_id)
        .bind(&log.claimer_id)
        .bind(&log.claimer_name)
        .bind(log.quantity_claimed)
        .bind(log.status)
        .bind(&log.notes)
        .bind(log.claimed_at)
        .bind(log.completed_at)
        .bind(log.is_deleted)
        .bind(log.deleted_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(listing = %log.listing_id, "listing claimed");
        Ok(ClaimOutcome::Claimed)
    }

    /// Completes a claimed listing: CLAIMED -> COMPLETED, and every active
    /// claim is stamped completed in the same transaction.
    ///
    /// Returns false when the listing was not in CLAIMED state.
    pub async fn complete(
        &self,
        listing_id: &str,
        notes: Option<&str>,
        completed_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        debug!(listing = %listing_id, "completing listing");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE food_listings SET
                status = 'completed',
                updated_at = ?2
            WHERE id = ?1 AND status = 'claimed' AND is_deleted = 0
            "#,
        )
        .bind(listing_id)
        .bind(completed_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            UPDATE sharing_logs SET
                status = 'completed',
                completed_at = ?2,
                notes = COALESCE(?3, notes)
            WHERE listing_id = ?1 AND status = 'claimed' AND is_deleted = 0
            "#,
        )
        .bind(listing_id)
        .bind(completed_at)
        .bind(notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(listing = %listing_id, "listing completed");
        Ok(true)
    }

    /// Updates the mutable fields of a listing, status included.
    ///
    /// No transition guard here: the lister-only patch path deliberately
    /// writes whatever it is given.
    pub async fn update(&self, listing: &FoodListing) -> DbResult<()> {
        debug!(id = %listing.id, "updating listing");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE food_listings SET
                title = ?2,
                description = ?3,
                quantity = ?4,
                pickup_location = ?5,
                available_until = ?6,
                status = ?7,
                updated_at = ?8
            WHERE id = ?1 AND is_deleted = 0
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.title)
        .bind(&listing.description)
        .bind(listing.quantity)
        .bind(&listing.pickup_location)
        .bind(listing.available_until)
        .bind(listing.status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("FoodListing", &listing.id));
        }

        Ok(())
    }

    /// Cancels (soft-deletes) an AVAILABLE listing with no active claims.
    pub async fn cancel(&self, listing_id: &str) -> DbResult<CancelOutcome> {
        debug!(listing = %listing_id, "cancelling listing");

        let mut tx = self.pool.begin().await?;

        let active: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sharing_logs
                WHERE listing_id = ?1 AND status = 'claimed' AND is_deleted = 0
            )
            "#,
        )
        .bind(listing_id)
        .fetch_one(&mut *tx)
        .await?;

        if active != 0 {
            return Ok(CancelOutcome::ActiveClaims);
        }

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE food_listings SET
                status = 'cancelled',
                is_deleted = 1,
                deleted_at = ?2,
                updated_at = ?2
            WHERE id = ?1 AND status = 'available' AND is_deleted = 0
            "#,
        )
        .bind(listing_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(CancelOutcome::NotAvailable);
        }

        tx.commit().await?;

        info!(listing = %listing_id, "listing cancelled");
        Ok(CancelOutcome::Cancelled)
    }

    /// Lists non-deleted listings matching the given filters, newest first.
    ///
    /// Filters AND together; the free-text search ORs across listing
    /// title/description and the underlying item's custom/catalog names.
    pub async fn list(
        &self,
        status: ListingStatus,
        location: Option<&str>,
        category: Option<&str>,
        search: Option<&str>,
        exclude_lister: Option<&str>,
    ) -> DbResult<Vec<FoodListing>> {
        let listings = sqlx::query_as::<_, FoodListing>(&format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM food_listings l
            LEFT JOIN inventory_items i ON i.id = l.inventory_item_id
            LEFT JOIN food_items f ON f.id = i.food_item_id AND f.is_deleted = 0
            WHERE l.is_deleted = 0
              AND l.status = ?1
              AND (?2 IS NULL OR l.pickup_location LIKE '%' || ?2 || '%')
              AND (?3 IS NULL OR f.category = ?3)
              AND (?4 IS NULL
                   OR l.title LIKE '%' || ?4 || '%'
                   OR l.description LIKE '%' || ?4 || '%'
                   OR i.custom_name LIKE '%' || ?4 || '%'
                   OR f.name LIKE '%' || ?4 || '%')
              AND (?5 IS NULL OR l.lister_id <> ?5)
            ORDER BY l.created_at DESC
            "#
        ))
        .bind(status)
        .bind(location)
        .bind(category)
        .bind(search)
        .bind(exclude_lister)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = listings.len(), "listed listings");
        Ok(listings)
    }

    /// Lists non-deleted claims for a listing, newest first.
    pub async fn claims(&self, listing_id: &str) -> DbResult<Vec<SharingLog>> {
        let logs = sqlx::query_as::<_, SharingLog>(&format!(
            r#"
            SELECT {SHARING_LOG_COLUMNS}
            FROM sharing_logs
            WHERE listing_id = ?1 AND is_deleted = 0
            ORDER BY claimed_at DESC
            "#
        ))
        .bind(listing_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }

    /// Checks whether a user holds an active claim on a listing.
    pub async fn has_active_claim(&self, listing_id: &str, claimer_id: &str) -> DbResult<bool> {
        let found: i64 = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM sharing_logs
                WHERE listing_id = ?1
                  AND claimer_id = ?2
                  AND status = 'claimed'
                  AND is_deleted = 0
            )
            "#,
        )
        .bind(listing_id)
        .bind(claimer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(found != 0)
    }
}
