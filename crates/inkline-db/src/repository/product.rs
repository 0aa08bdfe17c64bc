//! # Product Repository
//!
//! Database operations for products, including the inventory ledger.
//!
//! ## Conditional Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Stock Stays Non-Negative                         │
//! │                                                                         │
//! │  ❌ WRONG: read, subtract in Rust, write back                          │
//! │     SELECT quantity ...        -- both cashiers read 10                │
//! │     UPDATE ... SET quantity = 4 -- both write 4, 12 units sold         │
//! │                                                                         │
//! │  ✅ CORRECT: compare-and-decrement in one statement                     │
//! │     UPDATE products SET quantity = quantity - 6                        │
//! │     WHERE id = ? AND quantity >= 6                                     │
//! │                                                                         │
//! │  Cashier A: 10 → 4   (rows_affected = 1)                               │
//! │  Cashier B: 4 < 6    (rows_affected = 0) → StockConflict               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The caller compares the summed `rows_affected` with the number of lines
//! and rolls back the whole transaction on any shortfall.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use inkline_core::validation::{
    validate_barcode, validate_decrement_quantity, validate_name, validate_non_negative,
    validate_search_query, validate_stock_quantity,
};
use inkline_core::{CoreError, NewProduct, Product, StockDecrement, ValidationError};

const PRODUCT_COLUMNS: &str = "id, name, barcode, cost_price_cents, retail_price_cents, quantity, \
     grn_number, category_id, supplier_id, image_url, image_public_id, is_active, \
     created_at, updated_at";

/// Filters for the product list.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Matches name or barcode.
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub supplier_id: Option<String>,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Barcode scan at the counter
/// let product = repo.get_by_barcode("4790001234567").await?;
///
/// // Manual restock
/// let product = repo.add_quantity(&product.id, 24).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its barcode (scanner input).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(barcode.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Fetches all products whose id is in `ids`, in one query.
    ///
    /// Unknown ids are simply absent from the result.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("));
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.as_str());
        }
        separated.push_unseparated(")");

        let products = qb.build_query_as::<Product>().fetch_all(&self.pool).await?;

        debug!(requested = ids.len(), found = products.len(), "Batch-fetched products");
        Ok(products)
    }

    /// Lists products ordered by name.
    pub async fn list(&self, filter: &ProductFilter) -> DbResult<Vec<Product>> {
        let search = validate_search_query(filter.search.as_deref())?.map(|q| format!("%{q}%"));

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE (?1 IS NULL OR name LIKE ?1 OR barcode LIKE ?1) \
             AND (?2 IS NULL OR category_id = ?2) \
             AND (?3 IS NULL OR supplier_id = ?3) \
             ORDER BY name"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(search)
            .bind(filter.category_id.as_deref())
            .bind(filter.supplier_id.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Checks
    /// - name and barcode required, prices and quantity non-negative
    /// - barcode not already taken
    /// - category exists, supplier exists when given
    ///
    /// The UNIQUE index on barcode still backs the pre-check when two
    /// inserts race.
    pub async fn insert(&self, input: NewProduct) -> DbResult<Product> {
        let name = validate_name(&input.name)?;
        let barcode = validate_barcode(&input.barcode)?;
        validate_non_negative("cost price", input.cost_price)?;
        validate_non_negative("retail price", input.retail_price)?;
        validate_stock_quantity(input.quantity)?;

        if self.get_by_barcode(&barcode).await?.is_some() {
            return Err(ValidationError::duplicate("barcode", barcode).into());
        }

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)")
                .bind(&input.category_id)
                .fetch_one(&self.pool)
                .await?;
        if !category_exists {
            return Err(DbError::not_found("Category", &input.category_id));
        }

        if let Some(supplier_id) = &input.supplier_id {
            let supplier_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = ?1)")
                    .bind(supplier_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !supplier_exists {
                return Err(DbError::not_found("Supplier", supplier_id));
            }
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name,
            barcode,
            cost_price_cents: input.cost_price.cents(),
            retail_price_cents: input.retail_price.cents(),
            quantity: input.quantity,
            grn_number: input.grn_number,
            category_id: input.category_id,
            supplier_id: input.supplier_id,
            image_url: input.image_url,
            image_public_id: input.image_public_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, barcode = %product.barcode, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, barcode, cost_price_cents, retail_price_cents, quantity,
                grn_number, category_id, supplier_id, image_url, image_public_id,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(product.cost_price_cents)
        .bind(product.retail_price_cents)
        .bind(product.quantity)
        .bind(&product.grn_number)
        .bind(&product.category_id)
        .bind(&product.supplier_id)
        .bind(&product.image_url)
        .bind(&product.image_public_id)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    // =========================================================================
    // Inventory Ledger
    // =========================================================================

    /// Applies the conditional decrement for every line on `conn`.
    ///
    /// Runs inside the caller's transaction. Returns the number of products
    /// actually decremented; a value below `lines.len()` means some line
    /// found less stock than requested, and the caller must roll back.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let mut tx = pool.begin().await?;
    /// let applied = ProductRepository::decrement_stock(&mut *tx, &lines).await?;
    /// if applied != lines.len() as u64 {
    ///     tx.rollback().await?;
    /// }
    /// ```
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        lines: &[StockDecrement],
    ) -> DbResult<u64> {
        for line in lines {
            validate_decrement_quantity(line.quantity)?;
        }

        let now = Utc::now();
        let mut applied = 0u64;

        for line in lines {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?1, updated_at = ?3
                WHERE id = ?2 AND quantity >= ?1
                "#,
            )
            .bind(line.quantity)
            .bind(&line.product_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;

            applied += result.rows_affected();
        }

        debug!(requested = lines.len(), applied, "Conditional stock decrement");
        Ok(applied)
    }

    /// Manual restock (or correction, when `amount` is negative).
    ///
    /// The resulting quantity must not go below zero.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Product with the new quantity
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(CoreError::NegativeStock)` - Would leave negative stock
    pub async fn add_quantity(&self, id: &str, amount: i64) -> DbResult<Product> {
        debug!(id = %id, amount, "Adjusting stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity + ?2, updated_at = ?3
            WHERE id = ?1 AND quantity + ?2 >= 0
            "#,
        )
        .bind(id)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(id).await? {
                None => Err(DbError::not_found("Product", id)),
                Some(_) => Err(CoreError::NegativeStock {
                    product_id: id.to_string(),
                }
                .into()),
            };
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
