//! # Seed Data Generator
//!
//! Populates a ledger database with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products (default)
//! cargo run -p shelfbook-store --bin seed
//!
//! # Generate custom amount
//! cargo run -p shelfbook-store --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p shelfbook-store --bin seed -- --db ./data/shelfbook.db
//! ```
//!
//! ## Generated Products
//! Every product goes through the same validation and valuation as a
//! typed-in form, and gets an `Added` history entry. Some lines are
//! deliberately low on stock and some expire soon so that every row alert
//! shows up in `shelfbook list`.

use chrono::{Duration, Local};
use std::env;
use std::sync::Arc;

use shelfbook_core::types::DATE_FORMAT;
use shelfbook_core::{LedgerSettings, ProductInput};
use shelfbook_store::{DbConfig, Ledger, SqliteStore};

/// Product categories for realistic sample data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Grains",
        &[
            "Rice", "Beans", "Garri", "Semovita", "Oats", "Maize Flour", "Millet", "Spaghetti",
        ],
    ),
    (
        "Dairy",
        &[
            "Peak Milk", "Evaporated Milk", "Yoghurt", "Butter", "Cheese", "Powdered Milk",
        ],
    ),
    (
        "Drinks",
        &[
            "Malt", "Bottled Water", "Orange Juice", "Cola", "Tea Bags", "Cocoa Drink",
        ],
    ),
    (
        "Provisions",
        &[
            "Vegetable Oil", "Palm Oil", "Tomato Paste", "Sugar", "Salt", "Seasoning Cubes",
            "Sardines", "Noodles",
        ],
    ),
    (
        "Toiletries",
        &[
            "Bar Soap", "Toothpaste", "Detergent", "Tissue Roll", "Body Cream",
        ],
    ),
];

/// Size and brand variants
const SIZES: &[&str] = &["Small", "Medium", "Large", "1kg", "5kg", "500ml", "1L"];
const BRANDS: &[&str] = &["Golden", "Mama's Pride", "Dangote", "Honeywell", "Dufil"];
const SUPPLIERS: &[&str] = &["Alaba Wholesale", "Mile 12 Traders", "Onitsha Depot"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 60;
    let mut db_path = String::from("./shelfbook_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Shelfbook Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./shelfbook_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Shelfbook Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let store = SqliteStore::connect(DbConfig::new(&db_path)).await?;
    let ledger = Ledger::open(Arc::new(store), LedgerSettings::default()).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = ledger.products().await.len();
    if existing > 0 {
        println!("⚠ Ledger already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let start = std::time::Instant::now();
    let mut generated = 0;

    'outer: for (category_idx, (category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (size_idx, size) in SIZES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let input = generate_product(
                    category,
                    name,
                    size,
                    category_idx * 1000 + name_idx * 20 + size_idx,
                );

                if let Err(e) = ledger.add_product(&input).await {
                    eprintln!("Failed to add {} {}: {}", name, size, e);
                    continue;
                }

                generated += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    let summary = ledger.dashboard().await;
    println!(
        "  Stock value: {}",
        summary
            .total_value
            .format_with_symbol(&ledger.settings().currency_symbol)
    );
    println!("  Low stock:   {}", summary.low_stock_count);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product form with realistic data.
fn generate_product(category: &str, name: &str, size: &str, seed: usize) -> ProductInput {
    // Cost: 150.00 - 9,149.50 in half-naira steps
    let cost_minor = 15_000 + ((seed * 7919) % 18_000) * 50;

    // Stock: 0 - 59, so a share of lines land under the reorder level
    let quantity = (seed * 31) % 60;

    // Every fourth line has its own reorder level
    let reorder_level = if seed % 4 == 0 { (seed % 15 + 3).to_string() } else { String::new() };

    // Perishables get an expiry date somewhere in the next 120 days
    let expiry_date = match category {
        "Dairy" | "Drinks" => (Local::now().date_naive() + Duration::days((seed % 120) as i64))
            .format(DATE_FORMAT)
            .to_string(),
        _ => String::new(),
    };

    ProductInput {
        name: format!("{} {}", name, size),
        cost_price: format!("{}.{:02}", cost_minor / 100, cost_minor % 100),
        quantity: quantity.to_string(),
        category: category.to_string(),
        brand: BRANDS[seed % BRANDS.len()].to_string(),
        size: size.to_string(),
        expiry_date,
        supplier: SUPPLIERS[seed % SUPPLIERS.len()].to_string(),
        reorder_level,
    }
}
