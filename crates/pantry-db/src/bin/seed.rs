//! # Seed Data Generator
//!
//! Populates a database with demo users, a food catalog, and a stocked
//! inventory for manual exploration.
//!
//! ## Usage
//! ```bash
//! cargo run -p pantry-db --bin seed
//! cargo run -p pantry-db --bin seed -- --db ./data/pantry.db
//! ```

use chrono::Utc;
use std::env;
use uuid::Uuid;

use pantry_core::{FoodItem, Inventory, InventoryItem, Quantity, User};
use pantry_db::{Database, DbConfig};

/// Catalog seed data: (name, category, unit, shelf life days).
const CATALOG: &[(&str, &str, &str, i64)] = &[
    ("Apple", "fruit", "pcs", 21),
    ("Banana", "fruit", "pcs", 7),
    ("Orange", "fruit", "pcs", 14),
    ("Tomato", "vegetable", "pcs", 7),
    ("Carrot", "vegetable", "kg", 21),
    ("Potato", "vegetable", "kg", 30),
    ("Onion", "vegetable", "kg", 30),
    ("Whole Milk", "dairy", "l", 7),
    ("Greek Yogurt", "dairy", "pcs", 14),
    ("Cheddar Cheese", "dairy", "kg", 30),
    ("Butter", "dairy", "kg", 60),
    ("Eggs", "dairy", "pcs", 28),
    ("Chicken Breast", "meat", "kg", 2),
    ("Ground Beef", "meat", "kg", 2),
    ("Salmon Fillet", "meat", "kg", 2),
    ("White Rice", "grain", "kg", 365),
    ("Spaghetti", "grain", "kg", 365),
    ("Bread", "grain", "pcs", 5),
    ("Rolled Oats", "grain", "kg", 180),
    ("Olive Oil", "pantry", "l", 365),
    ("Canned Tomatoes", "pantry", "pcs", 365),
    ("Black Beans", "pantry", "pcs", 365),
];

/// Demo users: (subject, display name).
const USERS: &[(&str, &str)] = &[
    ("seed|alice", "Alice"),
    ("seed|bob", "Bob"),
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let db_path = parse_db_path().unwrap_or_else(|| "pantry.db".to_string());

    tracing::info!(db = %db_path, "seeding database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .expect("failed to open database");

    let now = Utc::now();

    let mut user_ids = Vec::new();
    for (subject, display_name) in USERS {
        let user = User {
            id: Uuid::new_v4().to_string(),
            subject: subject.to_string(),
            display_name: display_name.to_string(),
            created_at: now,
        };
        db.users().insert(&user).await.expect("insert user");
        user_ids.push(user.id);
    }
    tracing::info!(count = user_ids.len(), "seeded users");

    let mut catalog_ids = Vec::new();
    for (name, category, unit, shelf_life) in CATALOG {
        let item = FoodItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: category.to_string(),
            unit: unit.to_string(),
            shelf_life_days: Some(*shelf_life),
            cost_per_unit_cents: None,
            description: None,
            is_deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        db.catalog().insert(&item).await.expect("insert catalog item");
        catalog_ids.push(item.id);
    }
    tracing::info!(count = catalog_ids.len(), "seeded catalog");

    let owner = &user_ids[0];
    let inventory = Inventory {
        id: Uuid::new_v4().to_string(),
        owner_id: owner.clone(),
        name: "Kitchen".to_string(),
        description: Some("Seeded demo inventory".to_string()),
        is_private: true,
        is_deleted: false,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    };
    db.inventories()
        .insert(&inventory)
        .await
        .expect("insert inventory");

    // Stock the first few catalog entries, varying quantities a little.
    for (n, (catalog_id, (name, _, unit, shelf_life))) in
        catalog_ids.iter().zip(CATALOG).enumerate().take(8)
    {
        let item = InventoryItem {
            id: Uuid::new_v4().to_string(),
            inventory_id: inventory.id.clone(),
            food_item_id: Some(catalog_id.clone()),
            custom_name: Some(name.to_string()),
            quantity: Quantity::from_milli(500 * (n as i64 + 1)),
            unit: Some(unit.to_string()),
            expiry_date: Some(now + chrono::Duration::days(*shelf_life)),
            notes: None,
            removed: false,
            is_deleted: false,
            deleted_at: None,
            added_by: owner.clone(),
            created_at: now,
            updated_at: now,
        };
        db.items().insert(&item).await.expect("insert inventory item");
    }

    tracing::info!(inventory = %inventory.id, "seeded inventory with items");
    tracing::info!("done");
}

/// Parses `--db <path>` from the command line.
fn parse_db_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|a| a == "--db")
        .and_then(|i| args.get(i + 1))
        .cloned()
}
