//! # Sale Repository
//!
//! Storage and lookup for recorded sales (invoices) and their items.
//!
//! ## Append-Only Ledger
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  CheckoutService::create_sale                                          │
//! │     └── insert_in(tx, sale)   sale row + items, same transaction       │
//! │                               as the stock decrement                    │
//! │                                                                         │
//! │  After commit: read-only                                               │
//! │     ├── get_with_items(id)                                             │
//! │     ├── list(query)           paged, searchable                        │
//! │     └── list_in_range(range)  reporting                                │
//! │                                                                         │
//! │  There is no update or delete. Later payments move the customer's      │
//! │  running totals, never the invoice.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use inkline_core::validation::{normalize_paging, validate_search_query};
use inkline_core::{DateRange, Pagination, Sale, SaleItem, SalePage, SaleQuery};

const SALE_COLUMNS: &str = "id, invoice_no, sold_at, subtotal_cents, discount_cents, tax_cents, \
     grand_total_cents, paid_cents, balance_cents, customer_id, cashier_id, created_at";

const ITEM_COLUMNS: &str = "sale_id, position, product_id, name_snapshot, barcode_snapshot, \
     quantity, unit_price_cents, discount_cents, discounted_price_cents, cost_price_cents, \
     line_total_cents";

/// ?1 search pattern, ?2 start, ?3 end, ?4 customer id
const SALE_FILTER: &str = "(?1 IS NULL \
       OR CAST(invoice_no AS TEXT) LIKE ?1 \
       OR EXISTS (SELECT 1 FROM sale_items si WHERE si.sale_id = sales.id AND si.name_snapshot LIKE ?1)) \
     AND (?2 IS NULL OR sold_at >= ?2) \
     AND (?3 IS NULL OR sold_at < ?3) \
     AND (?4 IS NULL OR customer_id = ?4)";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale and its items on `conn` (the checkout transaction).
    pub async fn insert_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, invoice_no = sale.invoice_no, items = sale.items.len(), "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, invoice_no, sold_at,
                subtotal_cents, discount_cents, tax_cents, grand_total_cents,
                paid_cents, balance_cents,
                customer_id, cashier_id, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&sale.id)
        .bind(sale.invoice_no)
        .bind(sale.sold_at)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.tax_cents)
        .bind(sale.grand_total_cents)
        .bind(sale.paid_cents)
        .bind(sale.balance_cents)
        .bind(&sale.customer_id)
        .bind(&sale.cashier_id)
        .bind(sale.created_at)
        .execute(&mut *conn)
        .await?;

        for item in &sale.items {
            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    sale_id, position, product_id, name_snapshot, barcode_snapshot,
                    quantity, unit_price_cents, discount_cents, discounted_price_cents,
                    cost_price_cents, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&item.sale_id)
            .bind(item.position)
            .bind(&item.product_id)
            .bind(&item.name_snapshot)
            .bind(&item.barcode_snapshot)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.discount_cents)
            .bind(item.discounted_price_cents)
            .bind(item.cost_price_cents)
            .bind(item.line_total_cents)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Gets a sale with its items in cart order.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(mut sale) = sale else {
            return Ok(None);
        };

        sale.items = self.get_items(&sale.id).await?;
        Ok(Some(sale))
    }

    /// Gets a sale by its invoice number.
    pub async fn get_by_invoice_no(&self, invoice_no: i64) -> DbResult<Option<Sale>> {
        let id: Option<String> = sqlx::query_scalar("SELECT id FROM sales WHERE invoice_no = ?1")
            .bind(invoice_no)
            .fetch_optional(&self.pool)
            .await?;

        match id {
            Some(id) => self.get_with_items(&id).await,
            None => Ok(None),
        }
    }

    /// Gets the items of one sale, ordered by position.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY position");
        let items = sqlx::query_as::<_, SaleItem>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Lists sales newest first, one page at a time.
    ///
    /// `search` matches the invoice number or any item name.
    pub async fn list(&self, query: &SaleQuery) -> DbResult<SalePage> {
        let (page, limit) = normalize_paging(query.page, query.limit);
        let pattern = validate_search_query(query.search.as_deref())?.map(|q| format!("%{q}%"));
        let offset = i64::from(page - 1) * i64::from(limit);

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM sales WHERE {SALE_FILTER}"))
            .bind(&pattern)
            .bind(query.range.start)
            .bind(query.range.end)
            .bind(query.customer_id.as_deref())
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE {SALE_FILTER} \
             ORDER BY sold_at DESC, invoice_no DESC LIMIT ?5 OFFSET ?6"
        );
        let mut sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(&pattern)
            .bind(query.range.start)
            .bind(query.range.end)
            .bind(query.customer_id.as_deref())
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        self.attach_items(&mut sales).await?;

        debug!(page, limit, total, returned = sales.len(), "Listed sales");

        Ok(SalePage {
            data: sales,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// All sales in `range`, newest first, with items.
    pub async fn list_in_range(&self, range: DateRange) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales \
             WHERE (?1 IS NULL OR sold_at >= ?1) AND (?2 IS NULL OR sold_at < ?2) \
             ORDER BY sold_at DESC, invoice_no DESC"
        );
        let mut sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        self.attach_items(&mut sales).await?;
        Ok(sales)
    }

    /// Loads the items of many sales in one query.
    async fn attach_items(&self, sales: &mut [Sale]) -> DbResult<()> {
        if sales.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ITEM_COLUMNS} FROM sale_items WHERE sale_id IN ("));
        let mut separated = qb.separated(", ");
        for sale in sales.iter() {
            separated.push_bind(sale.id.clone());
        }
        separated.push_unseparated(") ORDER BY sale_id, position");

        let items = qb.build_query_as::<SaleItem>().fetch_all(&self.pool).await?;

        let mut by_sale: HashMap<String, Vec<SaleItem>> = HashMap::new();
        for item in items {
            by_sale.entry(item.sale_id.clone()).or_default().push(item);
        }
        for sale in sales.iter_mut() {
            sale.items = by_sale.remove(&sale.id).unwrap_or_default();
        }

        Ok(())
    }

    /// Counts recorded sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
