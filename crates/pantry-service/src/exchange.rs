//! # Sharing Exchange
//!
//! Owns the FoodListing -> SharingLog lifecycle.
//!
//! ## Listing State Machine
//! ```text
//! AVAILABLE ──claim──► CLAIMED ──complete──► COMPLETED (terminal)
//!     │
//!     └──delete (no active claims)──► CANCELLED (terminal)
//! ```
//!
//! There is no claim-withdrawal transition (CLAIMED back to AVAILABLE);
//! that operation intentionally does not exist.
//!
//! Authorization rules: anyone but the lister may claim; only the lister
//! or an active claimer may complete; only the lister may update or
//! delete. The lister-only update is an unguarded field patch, status
//! included.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use pantry_core::validation::{validate_name, validate_quantity, validate_search_query};
use pantry_core::{
    ClaimRequest, ClaimStatus, FoodListing, ListingFilter, ListingPatch, ListingStatus,
    NewListing, SharingLog,
};
use pantry_db::{CancelOutcome, ClaimOutcome, Database};

use crate::error::{ServiceError, ServiceResult};

/// The sharing exchange service.
///
/// Cheap to clone; all clones share one database pool.
#[derive(Debug, Clone)]
pub struct SharingExchange {
    db: Database,
}

impl SharingExchange {
    /// Creates an exchange over the given database.
    pub fn new(db: Database) -> Self {
        SharingExchange { db }
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Creates a listing from one of the caller's inventory items.
    ///
    /// The item must be live (not deleted, not exhausted) and owned by the
    /// caller; anything else reads as `NotFound`. At most one AVAILABLE
    /// listing may exist per item - a second creation fails `Conflict`.
    /// `quantity` defaults to the item's current quantity; the unit is
    /// always copied from the item.
    pub async fn create_listing(
        &self,
        user_id: &str,
        input: NewListing,
    ) -> ServiceResult<FoodListing> {
        let title = validate_name("title", &input.title)?;

        let item = self
            .db
            .items()
            .get(&input.inventory_item_id)
            .await?
            .filter(|item| !item.removed)
            .ok_or_else(|| ServiceError::not_found("InventoryItem", &input.inventory_item_id))?;

        // Ownership runs through the item's inventory; a miss is presented
        // as the item not existing.
        self.db
            .inventories()
            .get_owned(&item.inventory_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("InventoryItem", &item.id))?;

        let quantity = input.quantity.unwrap_or(item.quantity);
        validate_quantity("quantity", quantity)?;

        let now = Utc::now();
        let listing = FoodListing {
            id: Uuid::new_v4().to_string(),
            inventory_item_id: item.id.clone(),
            lister_id: user_id.to_string(),
            title,
            description: input.description,
            quantity,
            unit: item.unit.clone(),
            pickup_location: input.pickup_location,
            available_until: input.available_until,
            status: ListingStatus::Available,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let created = self.db.listings().insert_available(&listing).await?;
        if !created {
            return Err(ServiceError::conflict(
                "an available listing already exists for this item",
            ));
        }

        info!(listing = %listing.id, item = %item.id, "listing created");
        Ok(listing)
    }

    /// Gets a non-deleted listing.
    pub async fn get_listing(&self, listing_id: &str) -> ServiceResult<FoodListing> {
        self.db
            .listings()
            .get(listing_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("FoodListing", listing_id))
    }

    /// Lists non-deleted listings matching the filter.
    ///
    /// Filters AND together; the free-text search ORs across listing
    /// title/description and the underlying item's custom/catalog names.
    /// Status defaults to AVAILABLE.
    pub async fn list_listings(
        &self,
        filter: ListingFilter,
        requesting_user: Option<&str>,
    ) -> ServiceResult<Vec<FoodListing>> {
        let search = filter
            .search
            .as_deref()
            .map(validate_search_query)
            .transpose()?
            .filter(|s| !s.is_empty());

        let status = filter.status.unwrap_or_default();
        let exclude_lister = if filter.exclude_own_listings {
            requesting_user
        } else {
            None
        };

        Ok(self
            .db
            .listings()
            .list(
                status,
                filter.location.as_deref(),
                filter.category.as_deref(),
                search.as_deref(),
                exclude_lister,
            )
            .await?)
    }

    // =========================================================================
    // Claims
    // =========================================================================

    /// Claims an AVAILABLE listing.
    ///
    /// `claimer_id` is `None` for anonymous claims (identified by the
    /// request's `claimer_name` only). Listers cannot claim their own
    /// listing; a user cannot hold two active claims on one listing.
    /// `quantity_claimed` defaults to the listing's full quantity.
    pub async fn claim(
        &self,
        listing_id: &str,
        claimer_id: Option<&str>,
        input: ClaimRequest,
    ) -> ServiceResult<SharingLog> {
        let listing = self.get_listing(listing_id).await?;

        // A non-AVAILABLE listing reads as absent to claimers.
        if listing.status != ListingStatus::Available {
            return Err(ServiceError::not_found("FoodListing", listing_id));
        }

        if claimer_id == Some(listing.lister_id.as_str()) {
            return Err(ServiceError::forbidden(
                "listers cannot claim their own listing",
            ));
        }

        let quantity_claimed = input.quantity_claimed.unwrap_or(listing.quantity);
        validate_quantity("quantityClaimed", quantity_claimed)?;

        let log = SharingLog {
            id: Uuid::new_v4().to_string(),
            listing_id: listing.id.clone(),
            claimer_id: claimer_id.map(str::to_string),
            claimer_name: input.claimer_name,
            quantity_claimed,
            status: ClaimStatus::Claimed,
            notes: input.notes,
            claimed_at: Utc::now(),
            completed_at: None,
            is_deleted: false,
            deleted_at: None,
        };

        debug!(listing = %listing.id, claimer = ?claimer_id, "claim attempt");

        match self.db.listings().claim(&log).await? {
            ClaimOutcome::Claimed => {
                info!(listing = %listing.id, log = %log.id, "claim recorded");
                Ok(log)
            }
            ClaimOutcome::NotAvailable => {
                Err(ServiceError::not_found("FoodListing", listing_id))
            }
            ClaimOutcome::AlreadyClaimedByUser => Err(ServiceError::conflict(
                "user already holds an active claim on this listing",
            )),
        }
    }

    /// Completes a CLAIMED listing.
    ///
    /// Permitted to the lister or any active claimer. Transitions the
    /// listing to COMPLETED and stamps every active claim completed, with
    /// the provided notes, in one transaction.
    pub async fn complete(
        &self,
        listing_id: &str,
        user_id: &str,
        notes: Option<String>,
    ) -> ServiceResult<FoodListing> {
        let listing = self.get_listing(listing_id).await?;

        let authorized = user_id == listing.lister_id
            || self
                .db
                .listings()
                .has_active_claim(listing_id, user_id)
                .await?;
        if !authorized {
            return Err(ServiceError::forbidden(
                "only the lister or an active claimer can complete a listing",
            ));
        }

        if listing.status != ListingStatus::Claimed {
            return Err(ServiceError::conflict("listing is not claimed"));
        }

        let completed = self
            .db
            .listings()
            .complete(listing_id, notes.as_deref(), Utc::now())
            .await?;
        if !completed {
            // Lost a race with another transition since the read above.
            return Err(ServiceError::conflict("listing is not claimed"));
        }

        info!(listing = %listing_id, "listing completed");
        self.get_listing(listing_id).await
    }

    // =========================================================================
    // Lister Maintenance
    // =========================================================================

    /// Patches a listing. Lister only.
    ///
    /// An arbitrary field patch, status included; no guard prevents the
    /// lister from forcing an otherwise-illegal status transition.
    pub async fn update_listing(
        &self,
        listing_id: &str,
        user_id: &str,
        patch: ListingPatch,
    ) -> ServiceResult<FoodListing> {
        let mut listing = self.get_listing(listing_id).await?;

        if listing.lister_id != user_id {
            return Err(ServiceError::forbidden(
                "only the lister can update a listing",
            ));
        }

        if let Some(title) = patch.title {
            listing.title = validate_name("title", &title)?;
        }
        if let Some(description) = patch.description {
            listing.description = Some(description);
        }
        if let Some(quantity) = patch.quantity {
            validate_quantity("quantity", quantity)?;
            listing.quantity = quantity;
        }
        if let Some(pickup_location) = patch.pickup_location {
            listing.pickup_location = Some(pickup_location);
        }
        if let Some(available_until) = patch.available_until {
            listing.available_until = Some(available_until);
        }
        if let Some(status) = patch.status {
            listing.status = status;
        }

        self.db.listings().update(&listing).await?;

        self.get_listing(listing_id).await
    }

    /// Deletes (cancels) a listing. Lister only.
    ///
    /// Fails `Conflict` while any claim is active, and only AVAILABLE
    /// listings are deletable - terminal states stay terminal. On success
    /// the listing is soft-deleted with status forced to CANCELLED.
    pub async fn delete_listing(&self, listing_id: &str, user_id: &str) -> ServiceResult<()> {
        let listing = self.get_listing(listing_id).await?;

        if listing.lister_id != user_id {
            return Err(ServiceError::forbidden(
                "only the lister can delete a listing",
            ));
        }

        match self.db.listings().cancel(listing_id).await? {
            CancelOutcome::Cancelled => {
                info!(listing = %listing_id, "listing cancelled");
                Ok(())
            }
            CancelOutcome::ActiveClaims => {
                Err(ServiceError::conflict("listing has active claims"))
            }
            CancelOutcome::NotAvailable => Err(ServiceError::conflict(
                "only available listings can be deleted",
            )),
        }
    }

    /// Lists a listing's claims. Lister or claimer only.
    pub async fn claims_for_listing(
        &self,
        listing_id: &str,
        user_id: &str,
    ) -> ServiceResult<Vec<SharingLog>> {
        let listing = self.get_listing(listing_id).await?;
        let claims = self.db.listings().claims(listing_id).await?;

        let authorized = user_id == listing.lister_id
            || claims
                .iter()
                .any(|claim| claim.claimer_id.as_deref() == Some(user_id));
        if !authorized {
            return Err(ServiceError::forbidden(
                "only the lister or a claimer can view claims",
            ));
        }

        Ok(claims)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InventoryLedger;
    use crate::testutil::{seed_catalog_item, seed_user, test_db};
    use pantry_core::{ItemFilter, NewInventory, NewItem, Quantity};

    struct Fixture {
        exchange: SharingExchange,
        ledger: InventoryLedger,
        db: Database,
        lister: String,
        claimer: String,
        inventory_id: String,
        item_id: String,
    }

    /// One lister with a 3 kg rice item, plus a second user.
    async fn fixture() -> Fixture {
        let db = test_db().await;
        let lister = seed_user(&db, "auth|alice", "Alice").await;
        let claimer = seed_user(&db, "auth|bob", "Bob").await;

        let ledger = InventoryLedger::new(db.clone());
        let inventory = ledger
            .create_inventory(
                &lister.id,
                NewInventory {
                    name: "Kitchen".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let item = ledger
            .add_item(
                &lister.id,
                &inventory.id,
                NewItem {
                    custom_name: Some("rice".to_string()),
                    quantity: Quantity::from_whole(3),
                    unit: Some("kg".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        Fixture {
            exchange: SharingExchange::new(db.clone()),
            ledger,
            db,
            lister: lister.id,
            claimer: claimer.id,
            inventory_id: inventory.id,
            item_id: item.id,
        }
    }

    fn new_listing(item_id: &str, title: &str) -> NewListing {
        NewListing {
            inventory_item_id: item_id.to_string(),
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_listing_defaults_from_item() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        assert_eq!(listing.status, ListingStatus::Available);
        assert_eq!(listing.quantity, Quantity::from_whole(3));
        assert_eq!(listing.unit.as_deref(), Some("kg"));
    }

    #[tokio::test]
    async fn test_single_available_listing_per_item() {
        let f = fixture().await;

        f.exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        let err = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice again"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_listing_requires_live_owned_item() {
        let f = fixture().await;

        // Not the owner.
        let err = f
            .exchange
            .create_listing(&f.claimer, new_listing(&f.item_id, "Not mine"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        // Exhausted item.
        f.ledger
            .consume(
                &f.lister,
                pantry_core::ConsumeRequest {
                    inventory_id: f.inventory_id.clone(),
                    inventory_item_id: Some(f.item_id.clone()),
                    item_name: "rice".to_string(),
                    quantity: Quantity::from_whole(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Empty bag"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_claim_flow() {
        let f = fixture().await;
        let charlie = seed_user(&f.db, "auth|charlie", "Charlie").await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        // Default claim takes the full listing quantity.
        let claim = f
            .exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();
        assert_eq!(claim.quantity_claimed, listing.quantity);
        assert_eq!(claim.status, ClaimStatus::Claimed);

        let listing = f.exchange.get_listing(&listing.id).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Claimed);

        // A second claimer sees the listing as gone, not as conflicted.
        let err = f
            .exchange
            .claim(&listing.id, Some(&charlie.id), ClaimRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_lister_cannot_claim_own_listing() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        let err = f
            .exchange
            .claim(&listing.id, Some(&f.lister), ClaimRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_double_claim_by_same_user_conflicts() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        f.exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();

        // The lister forces the listing back to AVAILABLE via the
        // unguarded patch path; the claimer's active claim still blocks a
        // second claim by the same user.
        f.exchange
            .update_listing(
                &listing.id,
                &f.lister,
                ListingPatch {
                    status: Some(ListingStatus::Available),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_anonymous_claim() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        let claim = f
            .exchange
            .claim(
                &listing.id,
                None,
                ClaimRequest {
                    claimer_name: Some("Neighbour Pat".to_string()),
                    quantity_claimed: Some(Quantity::from_whole(1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(claim.claimer_id.is_none());
        assert_eq!(claim.claimer_name.as_deref(), Some("Neighbour Pat"));
        assert_eq!(claim.quantity_claimed, Quantity::from_whole(1));
    }

    #[tokio::test]
    async fn test_complete_flow_and_terminality() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();
        f.exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();

        let completed = f
            .exchange
            .complete(&listing.id, &f.lister, Some("picked up at 6pm".to_string()))
            .await
            .unwrap();
        assert_eq!(completed.status, ListingStatus::Completed);

        let claims = f
            .exchange
            .claims_for_listing(&listing.id, &f.lister)
            .await
            .unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].status, ClaimStatus::Completed);
        assert!(claims[0].completed_at.is_some());
        assert_eq!(claims[0].notes.as_deref(), Some("picked up at 6pm"));

        // COMPLETED is terminal: no delete, no re-complete, no claim.
        let err = f
            .exchange
            .delete_listing(&listing.id, &f.lister)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = f
            .exchange
            .complete(&listing.id, &f.lister, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let err = f
            .exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_complete_authorization() {
        let f = fixture().await;
        let stranger = seed_user(&f.db, "auth|mallory", "Mallory").await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        // Completing an AVAILABLE listing is a conflict, not a transition.
        let err = f
            .exchange
            .complete(&listing.id, &f.lister, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        f.exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();

        // A bystander may not complete.
        let err = f
            .exchange
            .complete(&listing.id, &stranger.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        // The active claimer may.
        let completed = f
            .exchange
            .complete(&listing.id, &f.claimer, None)
            .await
            .unwrap();
        assert_eq!(completed.status, ListingStatus::Completed);
    }

    #[tokio::test]
    async fn test_delete_with_active_claim_conflicts() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();
        f.exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();

        // Force back to AVAILABLE so delete's claim check is what trips.
        f.exchange
            .update_listing(
                &listing.id,
                &f.lister,
                ListingPatch {
                    status: Some(ListingStatus::Available),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = f
            .exchange
            .delete_listing(&listing.id, &f.lister)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Listing unchanged and still visible.
        let listing = f.exchange.get_listing(&listing.id).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Available);
    }

    #[tokio::test]
    async fn test_delete_available_listing_cancels() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        // Only the lister may delete.
        let err = f
            .exchange
            .delete_listing(&listing.id, &f.claimer)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        f.exchange.delete_listing(&listing.id, &f.lister).await.unwrap();

        // Soft-deleted: gone from reads, claim attempts miss.
        let err = f.exchange.get_listing(&listing.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        // The item is free for a fresh listing again.
        f.exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice, take two"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_listings_filters() {
        let f = fixture().await;
        seed_catalog_item(&f.db, "Sourdough Bread", "bakery", "pcs").await;

        let loaf = f
            .ledger
            .add_item(
                &f.lister,
                &f.inventory_id,
                NewItem {
                    custom_name: Some("sourdough bread".to_string()),
                    quantity: Quantity::from_whole(2),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let rice_listing = f
            .exchange
            .create_listing(
                &f.lister,
                NewListing {
                    inventory_item_id: f.item_id.clone(),
                    title: "Rice surplus".to_string(),
                    pickup_location: Some("Maple Street 12".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        f.exchange
            .create_listing(
                &f.lister,
                NewListing {
                    inventory_item_id: loaf.id.clone(),
                    title: "Fresh loaf".to_string(),
                    pickup_location: Some("Oak Avenue 3".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Default status filter: AVAILABLE only.
        let all = f
            .exchange
            .list_listings(ListingFilter::default(), None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        // Search matches the catalog name of the underlying item.
        let bread = f
            .exchange
            .list_listings(
                ListingFilter {
                    search: Some("sourdough".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(bread.len(), 1);
        assert_eq!(bread[0].title, "Fresh loaf");

        // Location substring.
        let maple = f
            .exchange
            .list_listings(
                ListingFilter {
                    location: Some("maple".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(maple.len(), 1);
        assert_eq!(maple[0].id, rice_listing.id);

        // Category of the catalog-backed item.
        let bakery = f
            .exchange
            .list_listings(
                ListingFilter {
                    category: Some("bakery".to_string()),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(bakery.len(), 1);

        // Excluding own listings hides everything the lister posted.
        let not_mine = f
            .exchange
            .list_listings(
                ListingFilter {
                    exclude_own_listings: true,
                    ..Default::default()
                },
                Some(&f.lister),
            )
            .await
            .unwrap();
        assert!(not_mine.is_empty());

        // Claimed listings only show up under an explicit status filter.
        f.exchange
            .claim(&rice_listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();
        let claimed = f
            .exchange
            .list_listings(
                ListingFilter {
                    status: Some(ListingStatus::Claimed),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, rice_listing.id);
    }

    #[tokio::test]
    async fn test_update_listing_lister_only_patch() {
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        let err = f
            .exchange
            .update_listing(
                &listing.id,
                &f.claimer,
                ListingPatch {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let updated = f
            .exchange
            .update_listing(
                &listing.id,
                &f.lister,
                ListingPatch {
                    title: Some("Rice, half price".to_string()),
                    quantity: Some(Quantity::from_whole(2)),
                    pickup_location: Some("Back porch".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Rice, half price");
        assert_eq!(updated.quantity, Quantity::from_whole(2));
        assert_eq!(updated.pickup_location.as_deref(), Some("Back porch"));
        // Unit was copied from the item and is not patchable.
        assert_eq!(updated.unit.as_deref(), Some("kg"));
    }

    #[tokio::test]
    async fn test_claims_view_authorization() {
        let f = fixture().await;
        let stranger = seed_user(&f.db, "auth|mallory", "Mallory").await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();
        f.exchange
            .claim(&listing.id, Some(&f.claimer), ClaimRequest::default())
            .await
            .unwrap();

        assert_eq!(
            f.exchange
                .claims_for_listing(&listing.id, &f.lister)
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            f.exchange
                .claims_for_listing(&listing.id, &f.claimer)
                .await
                .unwrap()
                .len(),
            1
        );

        let err = f
            .exchange
            .claims_for_listing(&listing.id, &stranger.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_exhausting_item_does_not_touch_listing() {
        // The ledger and exchange are deliberately decoupled: consuming an
        // item to zero leaves its existing listing untouched.
        let f = fixture().await;

        let listing = f
            .exchange
            .create_listing(&f.lister, new_listing(&f.item_id, "Rice to share"))
            .await
            .unwrap();

        f.ledger
            .consume(
                &f.lister,
                pantry_core::ConsumeRequest {
                    inventory_id: f.inventory_id.clone(),
                    inventory_item_id: Some(f.item_id.clone()),
                    item_name: "rice".to_string(),
                    quantity: Quantity::from_whole(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let listing = f.exchange.get_listing(&listing.id).await.unwrap();
        assert_eq!(listing.status, ListingStatus::Available);

        // And the exhausted item is out of the ledger's active view.
        let items = f
            .ledger
            .list_items(&f.lister, &f.inventory_id, ItemFilter::default())
            .await
            .unwrap();
        assert!(items.iter().all(|i| i.id != f.item_id));
    }
}
