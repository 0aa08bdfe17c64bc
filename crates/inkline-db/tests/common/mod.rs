//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use inkline_core::{CartLine, Money, NewCategory, NewParty, NewProduct, Product, SaleRequest};
use inkline_db::{Database, DbConfig};
use tempfile::TempDir;

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// File-backed database so several connections can race.
pub async fn file_db(connections: u32) -> (Database, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("pos.db")).max_connections(connections))
        .await
        .unwrap();
    (db, dir)
}

pub async fn category(db: &Database) -> String {
    db.categories()
        .create(NewCategory {
            name: "Stationery".into(),
            code: Some("ST".into()),
        })
        .await
        .unwrap()
        .id
}

pub async fn product(
    db: &Database,
    category_id: &str,
    name: &str,
    quantity: i64,
    retail: Money,
    cost: Money,
) -> Product {
    db.products()
        .insert(NewProduct {
            name: name.into(),
            barcode: name.replace(' ', "-").to_uppercase(),
            cost_price: cost,
            retail_price: retail,
            quantity,
            grn_number: None,
            category_id: category_id.into(),
            supplier_id: None,
            image_url: None,
            image_public_id: None,
        })
        .await
        .unwrap()
}

pub fn party(name: &str) -> NewParty {
    NewParty {
        name: name.into(),
        code: None,
        phone: None,
        address: None,
    }
}

pub fn line(product_id: &str, quantity: i64) -> CartLine {
    CartLine {
        product_id: product_id.into(),
        quantity,
        unit_price: None,
        discount: None,
    }
}

pub fn cart(lines: Vec<CartLine>) -> SaleRequest {
    SaleRequest {
        items: lines,
        ..Default::default()
    }
}

pub fn rs(amount: i64) -> Money {
    Money::from_cents(amount * 100)
}

pub async fn quantity_of(db: &Database, product_id: &str) -> i64 {
    db.products().get_by_id(product_id).await.unwrap().unwrap().quantity
}
