//! Database seeder for Botica development and testing.
//!
//! Seeds an admin user, a walk-in client, and a small shelf of medicines for
//! local development. Roles are seeded by the initial migration.
//!
//! Usage: cargo run --bin seeder

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use botica_core::auth::hash_password;
use botica_db::entities::{clients, medicine, users};

/// Admin role ID seeded by the initial migration.
const ADMIN_ROLE_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Seeded admin user ID (consistent for all seeds).
const ADMIN_USER_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Seeded walk-in client ID.
const WALKIN_CLIENT_ID: &str = "00000000-0000-0000-0000-000000000020";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = botica_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding admin user...");
    seed_admin_user(&db).await;

    println!("Seeding walk-in client...");
    seed_walkin_client(&db).await;

    println!("Seeding medicines...");
    seed_medicines(&db).await;

    println!("Seeding complete!");
}

fn admin_user_id() -> Uuid {
    Uuid::parse_str(ADMIN_USER_ID).unwrap()
}

/// Seeds the default admin account (admin@botica.dev / admin1234).
async fn seed_admin_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Admin user already exists, skipping...");
        return;
    }

    let password_hash = hash_password("admin1234").expect("Failed to hash seed password");
    let now = Utc::now().into();

    let user = users::ActiveModel {
        id: Set(admin_user_id()),
        name: Set("Administrador".to_string()),
        email: Set("admin@botica.dev".to_string()),
        password_hash: Set(password_hash),
        role_id: Set(Uuid::parse_str(ADMIN_ROLE_ID).unwrap()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert admin user: {e}");
    } else {
        println!("  Created admin user: admin@botica.dev");
    }
}

/// Seeds a generic walk-in client for counter sales.
async fn seed_walkin_client(db: &DatabaseConnection) {
    let client_id = Uuid::parse_str(WALKIN_CLIENT_ID).unwrap();

    if clients::Entity::find_by_id(client_id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Walk-in client already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let client = clients::ActiveModel {
        id: Set(client_id),
        name: Set("Cliente ocasional".to_string()),
        email: Set(None),
        phone: Set(None),
        cedula: Set(None),
        rnc: Set(None),
        address: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    if let Err(e) = client.insert(db).await {
        eprintln!("Failed to insert walk-in client: {e}");
    } else {
        println!("  Created walk-in client");
    }
}

/// Seeds a small shelf of medicines with mixed stock and expiry dates.
async fn seed_medicines(db: &DatabaseConnection) {
    let shelf: &[(&str, &str, i32, i64, u64)] = &[
        // (name, category, stock, price cents, days until expiry)
        ("Amoxicilina 500mg", "Antibióticos", 40, 1250, 365),
        ("Ibuprofeno 400mg", "Analgésicos", 120, 475, 540),
        ("Paracetamol 500mg", "Analgésicos", 8, 350, 180),
        ("Loratadina 10mg", "Antialérgicos", 60, 310, 25),
        ("Omeprazol 20mg", "Gastrointestinal", 5, 1000, 400),
    ];

    let today = Utc::now().date_naive();

    let exists = medicine::Entity::find()
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();
    if exists {
        println!("  Medicines already seeded, skipping...");
        return;
    }

    for (i, (name, category, stock, price_cents, expiry_days)) in shelf.iter().enumerate() {
        let barcode = format!("MED-SEED-{i:04}");

        let now = Utc::now().into();
        let row = medicine::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set((*name).to_string()),
            description: Set(None),
            stock: Set(*stock),
            price: Set(Decimal::new(*price_cents, 2)),
            expiration_date: Set(today
                .checked_add_days(Days::new(*expiry_days))
                .expect("expiry date in range")),
            lot_number: Set(format!("L-{:04}", i + 1)),
            category: Set(Some((*category).to_string())),
            barcode: Set(barcode),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match row.insert(db).await {
            Ok(m) => println!("  Created medicine: {}", m.name),
            Err(e) => eprintln!("Failed to insert medicine {name}: {e}"),
        }
    }
}
