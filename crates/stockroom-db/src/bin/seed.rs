//! # Seed Data Generator
//!
//! Creates the first OWNER account and a small sample catalog for
//! development.
//!
//! ## Usage
//! ```bash
//! # Owner + sample data in ./stockroom_dev.db
//! cargo run -p stockroom-db --bin seed -- --email owner@shop.example --password secret1
//!
//! # Owner only, custom database
//! cargo run -p stockroom-db --bin seed -- --db ./data/stockroom.db \
//!     --email owner@shop.example --password secret1 --no-samples
//! ```
//!
//! ## Generated Data
//! - One OWNER account (skipped when an OWNER already exists)
//! - Sample categories (Beverages, Snacks, Stationery, ...)
//! - A handful of items per category, created by the owner
//!
//! Sample data is only added to a database without categories and items.

use std::env;
use stockroom_core::validation::{validate_email, validate_password};
use stockroom_core::{CategoryDraft, InventoryDraft, Money, NewUser, Role};
use stockroom_db::{hash_password, Database, DbConfig};

/// Sample catalog: (category, description, [(code, description, sale cents, cost cents)])
const CATALOG: &[(&str, &str, &[(&str, &str, i64, i64)])] = &[
    (
        "Beverages",
        "Soft drinks, water and juice",
        &[
            ("BEV-COLA-330", "Cola 330ml can", 150, 90),
            ("BEV-WATER-500", "Still water 500ml", 100, 40),
            ("BEV-OJ-1L", "Orange juice 1L", 349, 210),
            ("BEV-TEA-ICED", "Iced tea 500ml", 199, 110),
        ],
    ),
    (
        "Snacks",
        "Chips, candy and cookies",
        &[
            ("SNK-CHIPS-SALT", "Salted chips 150g", 249, 140),
            ("SNK-CHOC-BAR", "Milk chocolate bar", 129, 70),
            ("SNK-PRETZEL", "Pretzels 200g", 219, 120),
        ],
    ),
    (
        "Stationery",
        "Pens, paper and office supplies",
        &[
            ("STA-PEN-BLUE", "Blue ballpoint pen", 99, 35),
            ("STA-PAD-A4", "A4 notepad, ruled", 299, 150),
            ("STA-TAPE", "Clear tape 19mm", 179, 80),
        ],
    ),
    ("Household", "Cleaning and kitchen goods", &[]),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./stockroom_dev.db");
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;
    let mut name = String::from("Store Owner");
    let mut samples = true;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--email" | "-e" => {
                if i + 1 < args.len() {
                    email = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--password" | "-p" => {
                if i + 1 < args.len() {
                    password = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--name" | "-n" => {
                if i + 1 < args.len() {
                    name = args[i + 1].clone();
                    i += 1;
                }
            }
            "--no-samples" => samples = false,
            "--help" | "-h" => {
                println!("Stockroom Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>         Database file path (default: ./stockroom_dev.db)");
                println!("  -e, --email <EMAIL>     Owner email");
                println!("  -p, --password <PASS>   Owner password (at least 6 characters)");
                println!("  -n, --name <NAME>       Owner display name (default: Store Owner)");
                println!("      --no-samples        Only create the owner");
                println!("  -h, --help              Show this help message");
                return Ok(());
            }
            other => {
                eprintln!("Unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Stockroom Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Owner account
    let owner_id = match (email, password) {
        (Some(email), Some(password)) => Some(ensure_owner(&db, &name, &email, &password).await?),
        (None, None) => {
            println!("⚠ No --email/--password given, skipping owner account");
            None
        }
        _ => {
            return Err("--email and --password must be given together".into());
        }
    };

    if !samples {
        println!();
        println!("✓ Seed complete!");
        return Ok(());
    }

    let Some(owner_id) = owner_id else {
        println!("⚠ Sample data needs an owner to attribute it to, skipping");
        return Ok(());
    };

    // Check existing data
    let existing = db.categories().count().await? + db.inventory().count().await?;
    if existing > 0 {
        println!("⚠ Database already has catalog data");
        println!("  Skipping samples to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating sample catalog...");

    let mut items = 0;
    for (category_name, description, products) in CATALOG {
        let category = db
            .categories()
            .create(
                &CategoryDraft {
                    name: category_name.to_string(),
                    description: Some(description.to_string()),
                },
                &owner_id,
            )
            .await?;

        for (n, (code, desc, sale, cost)) in products.iter().enumerate() {
            let draft = InventoryDraft {
                item_code: code.to_string(),
                barcode: Some(format!("590{:010}", items + 1)),
                item_desc: desc.to_string(),
                sale_price: Money::from_cents(*sale),
                cost_price: Money::from_cents(*cost),
                stock: ((n as i64 + 1) * 12) % 50,
                category_id: Some(category.id.clone()),
                supplier: None,
            };

            if let Err(e) = db.inventory().create(&draft, &owner_id).await {
                eprintln!("Failed to insert {}: {}", draft.item_code, e);
                continue;
            }
            items += 1;
        }

        println!("  {} ({} items)", category.name, products.len());
    }

    println!();
    println!("✓ Generated {} categories and {} items", CATALOG.len(), items);
    println!("✓ Seed complete!");

    Ok(())
}

/// Creates the OWNER account unless an owner already exists. Returns the
/// id of the account samples are attributed to.
async fn ensure_owner(
    db: &Database,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let email = validate_email(email)?;
    validate_password(password)?;

    if let Some(existing) = db.users().find_credentials(&email).await? {
        println!("✓ Owner {} already exists", existing.email);
        return Ok(existing.id);
    }

    if db.users().count_by_role(Role::Owner).await? > 0 {
        println!("⚠ An owner account already exists; creating {} anyway", email);
    }

    let user = db
        .users()
        .create(&NewUser {
            name: name.trim().to_string(),
            email,
            password_hash: hash_password(password)?,
            role: Role::Owner,
        })
        .await?;

    println!("✓ Created owner {}", user.email);
    Ok(user.id)
}
