//! # Seed Data Generator
//!
//! Populates a development database with a print/communications shop
//! catalogue.
//!
//! ## Usage
//! ```bash
//! # Seed ./inkline_dev.db with every variant (default)
//! cargo run -p inkline-db --bin seed
//!
//! # Limit the number of products
//! cargo run -p inkline-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p inkline-db --bin seed -- --db ./data/inkline.db
//! ```
//!
//! ## Generated Data
//! - Categories: Stationery, Printing, Mobile Accessories, Reload Cards
//! - One supplier per category
//! - A walk-in customer and an account customer
//! - Products: `{item} {variant}`, barcode `479{seed:010}`, stock 0-60

use std::env;

use inkline_core::{Money, NewCategory, NewParty, NewProduct};
use inkline_db::{Database, DbConfig};

/// (category, code, supplier, items)
const CATALOGUE: &[(&str, &str, &str, &[&str])] = &[
    (
        "Stationery",
        "ST",
        "Lanka Paper Mills",
        &[
            "A4 Copy Paper",
            "Ball Pen",
            "Gel Pen",
            "Pencil HB",
            "Eraser",
            "Stapler",
            "Glue Stick",
            "Exercise Book",
            "File Cover",
            "Highlighter",
        ],
    ),
    (
        "Printing",
        "PR",
        "Colombo Print Supplies",
        &[
            "Photo Paper",
            "Laminating Pouch",
            "Ink Cartridge Black",
            "Ink Cartridge Colour",
            "Toner",
            "Sticker Sheet",
            "Business Card Stock",
            "Binding Comb",
        ],
    ),
    (
        "Mobile Accessories",
        "MA",
        "Metro Mobile Distributors",
        &[
            "USB-C Cable",
            "Micro USB Cable",
            "Wall Charger",
            "Earphones",
            "Screen Guard",
            "Phone Cover",
            "Power Bank",
        ],
    ),
    (
        "Reload Cards",
        "RC",
        "Island Telecom Agents",
        &["Reload Card 100", "Reload Card 200", "Reload Card 500"],
    ),
];

/// Variant suffix and price add-on in cents
const VARIANTS: &[(&str, i64)] = &[("", 0), ("Pack of 5", 400), ("Pack of 10", 900)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = usize::MAX;
    let mut db_path = String::from("./inkline_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(usize::MAX);
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
                println!("Inkline POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Maximum number of products (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./inkline_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Inkline POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for (name, code) in [("Walk-in Customer", None), ("Sunrise Academy", Some("C-0001"))] {
        db.customers()
            .create(NewParty {
                name: name.to_string(),
                code: code.map(String::from),
                phone: None,
                address: None,
            })
            .await?;
    }
    println!("✓ Created customers");

    let mut generated = 0usize;
    let start = std::time::Instant::now();

    'catalogue: for (category_idx, (category_name, code, supplier_name, items)) in
        CATALOGUE.iter().enumerate()
    {
        let category = db
            .categories()
            .create(NewCategory {
                name: category_name.to_string(),
                code: Some(code.to_string()),
            })
            .await?;

        let supplier = db
            .suppliers()
            .create(NewParty {
                name: supplier_name.to_string(),
                code: Some(format!("S-{code}")),
                phone: None,
                address: None,
            })
            .await?;

        for (item_idx, item) in items.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= count {
                    break 'catalogue;
                }

                let seed = category_idx * 1000 + item_idx * 10 + variant_idx;
                let product = generate_product(
                    item,
                    variant,
                    *price_addon,
                    seed,
                    &category.id,
                    &supplier.id,
                );

                if let Err(e) = db.products().insert(product).await {
                    eprintln!("Failed to insert {} {}: {}", item, variant, e);
                    continue;
                }

                generated += 1;
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!("  Next invoice number: {}", db.invoices().peek().await?);
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one product with deterministic pseudo-random figures.
fn generate_product(
    item: &str,
    variant: &str,
    price_addon: i64,
    seed: usize,
    category_id: &str,
    supplier_id: &str,
) -> NewProduct {
    // 50.00 - 1,549.00 plus the variant add-on
    let retail_cents = 5000 + ((seed * 37) % 1500) as i64 * 100 + price_addon * 100;
    // Cost at 55-75% of retail
    let cost_pct = 55 + (seed % 21) as i64;

    let name = if variant.is_empty() {
        item.to_string()
    } else {
        format!("{item} {variant}")
    };

    NewProduct {
        name,
        barcode: format!("479{:010}", seed),
        cost_price: Money::from_cents(retail_cents * cost_pct / 100),
        retail_price: Money::from_cents(retail_cents),
        quantity: (seed % 61) as i64,
        grn_number: Some(format!("GRN-{:05}", seed / 10)),
        category_id: category_id.to_string(),
        supplier_id: Some(supplier_id.to_string()),
        image_url: None,
        image_public_id: None,
    }
}
