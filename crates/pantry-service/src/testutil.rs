//! Shared helpers for service tests: in-memory database plus seeded users
//! and catalog entries.

use chrono::Utc;
use uuid::Uuid;

use pantry_core::{FoodItem, User};
use pantry_db::{Database, DbConfig};

/// Opens a fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Inserts a user and returns it.
pub async fn seed_user(db: &Database, subject: &str, display_name: &str) -> User {
    let user = User {
        id: Uuid::new_v4().to_string(),
        subject: subject.to_string(),
        display_name: display_name.to_string(),
        created_at: Utc::now(),
    };
    db.users().insert(&user).await.expect("seed user");
    user
}

/// Inserts a catalog entry and returns it.
pub async fn seed_catalog_item(
    db: &Database,
    name: &str,
    category: &str,
    unit: &str,
) -> FoodItem {
    let now = Utc::now();
    let item = FoodItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        category: category.to_string(),
        unit: unit.to_string(),
        shelf_life_days: Some(7),
        cost_per_unit_cents: None,
        description: None,
        is_deleted: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    };
    db.catalog().insert(&item).await.expect("seed catalog item");
    item
}
