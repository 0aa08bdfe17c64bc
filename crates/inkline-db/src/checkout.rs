//! # Checkout
//!
//! The sale transaction: cart in, recorded invoice out, or an error with no
//! partial effects.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CheckoutService::create_sale                        │
//! │                                                                         │
//! │  1. cart empty?                     ──► EmptyCart                       │
//! │  2. batch-fetch products                                                │
//! │  3. per line: unknown id            ──► ProductNotFound                 │
//! │               qty ≤ 0               ──► InvalidQuantity                 │
//! │               qty > on hand         ──► InsufficientStock               │
//! │  4. price lines        (pure)       overflow ──► Validation(OutOfRange) │
//! │  5. compute totals     (pure)       overflow ──► Validation(OutOfRange) │
//! │     ─────────────── nothing written above this line ───────────────     │
//! │  6. BEGIN                                                               │
//! │     conditional decrement per line                                      │
//! │     applied ≠ lines?                ──► ROLLBACK, StockConflict         │
//! │  7. allocate invoice number                                             │
//! │  8. insert sale + items, COMMIT                                         │
//! │     ─────────────── sale is durable below this line ───────────────     │
//! │  9. customer rollup (best-effort, failures logged and dropped)          │
//! │ 10. return Sale                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 3 and 6 both check stock. Step 3 gives the friendly message from a
//! point-in-time read; step 6 is the one that actually protects the
//! quantity. A request that passes 3 and then loses the race at 6 gets the
//! generic conflict and the cashier resubmits. Nothing retries
//! automatically, and a resubmission is a new attempt with a new number.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use crate::repository::invoice::InvoiceSequencer;
use crate::repository::party::CustomerRepository;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use inkline_core::pricing::{price_line, PricedLine, SaleTotals};
use inkline_core::validation::{validate_cart_size, validate_non_negative};
use inkline_core::{
    CoreError, Money, Product, Sale, SaleItem, SaleRequest, StockDecrement, SALE_INVOICE_COUNTER,
};

/// A validated, priced cart line with its product snapshot.
#[derive(Debug, Clone)]
struct PreparedLine {
    product_id: String,
    name: String,
    barcode: String,
    cost_price: Money,
    priced: PricedLine,
}

/// Orchestrates the sale transaction.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutService { pool }
    }

    /// Records a sale for `cashier_id`.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - Committed sale with its invoice number and items
    /// * `Err(CoreError::EmptyCart | InvalidQuantity | InsufficientStock | Validation)` -
    ///   `Validation` also covers amounts too large to total
    /// * `Err(CoreError::ProductNotFound)` - A line's product id does not resolve
    /// * `Err(CoreError::StockConflict)` - Lost a race for stock; resubmit
    ///
    /// A failed customer rollup is logged, never returned.
    pub async fn create_sale(&self, cashier_id: &str, request: SaleRequest) -> DbResult<Sale> {
        // 1. Cart shape
        if request.items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_cart_size(request.items.len())?;

        let discount = request.discount.unwrap_or_default();
        let tax = request.tax.unwrap_or_default();
        let paid = request.paid.unwrap_or_default();
        validate_non_negative("discount", discount)?;
        validate_non_negative("tax", tax)?;
        validate_non_negative("paid amount", paid)?;

        // 2. Products in one query
        let ids: Vec<String> = request.items.iter().map(|l| l.product_id.clone()).collect();
        let products: HashMap<String, Product> = ProductRepository::new(self.pool.clone())
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        // 3 + 4. Validate and price each line
        let lines = prepare_lines(&request, &products)?;

        // 5. Totals
        let line_totals: Vec<Money> = lines.iter().map(|l| l.priced.line_total).collect();
        let totals = SaleTotals::compute(&line_totals, discount, tax, paid)?;

        debug!(
            cashier_id = %cashier_id,
            lines = lines.len(),
            grand_total = totals.grand_total.cents(),
            "Cart validated"
        );

        // 6. Decrement inside the sale transaction
        let decrements: Vec<StockDecrement> = lines
            .iter()
            .map(|l| StockDecrement {
                product_id: l.product_id.clone(),
                quantity: l.priced.quantity,
            })
            .collect();

        let mut tx = self.pool.begin().await?;

        let applied = ProductRepository::decrement_stock(&mut *tx, &decrements).await?;
        if applied != decrements.len() as u64 {
            tx.rollback().await?;
            warn!(
                cashier_id = %cashier_id,
                requested = decrements.len(),
                applied,
                "Stock update conflict, sale rolled back"
            );
            return Err(CoreError::StockConflict {
                requested: decrements.len(),
                applied,
            }
            .into());
        }

        // 7. Invoice number, only after stock is secured
        let invoice_no = InvoiceSequencer::allocate_in(&mut *tx, SALE_INVOICE_COUNTER).await?;

        // 8. Persist and commit
        let sale = build_sale(invoice_no, cashier_id, request.customer_id, &lines, &totals);
        SaleRepository::insert_in(&mut *tx, &sale).await?;
        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            invoice_no = sale.invoice_no,
            cashier_id = %cashier_id,
            grand_total = sale.grand_total_cents,
            balance = sale.balance_cents,
            "Sale recorded"
        );

        // 9. Best-effort rollup
        if let Some(customer_id) = &sale.customer_id {
            self.rollup_customer(customer_id, &sale).await;
        }

        // 10.
        Ok(sale)
    }

    /// Adds the committed sale to the customer's totals. Never fails.
    async fn rollup_customer(&self, customer_id: &str, sale: &Sale) {
        let customers = CustomerRepository::new(self.pool.clone());
        let grand_total = Money::from_cents(sale.grand_total_cents);
        let paid = Money::from_cents(sale.paid_cents);

        match customers.apply_sale_rollup(customer_id, grand_total, paid).await {
            Ok(true) => debug!(
                customer_id = %customer_id,
                invoice_no = sale.invoice_no,
                "Customer totals updated"
            ),
            Ok(false) => warn!(
                customer_id = %customer_id,
                invoice_no = sale.invoice_no,
                "Customer not found during sale rollup"
            ),
            Err(err) => error!(
                customer_id = %customer_id,
                invoice_no = sale.invoice_no,
                purchased_delta = grand_total.cents(),
                paid_delta = paid.cents(),
                error = %err,
                "Customer rollup failed; totals now lag the ledger"
            ),
        }
    }
}

// =============================================================================
// Pure steps
// =============================================================================

/// Validates every line against the fetched products and prices it.
///
/// Stock is checked against the running total requested for each product,
/// so a product split over two lines cannot pass with more than is on hand.
fn prepare_lines(
    request: &SaleRequest,
    products: &HashMap<String, Product>,
) -> Result<Vec<PreparedLine>, CoreError> {
    let mut requested: HashMap<&str, i64> = HashMap::new();
    let mut lines = Vec::with_capacity(request.items.len());

    for line in &request.items {
        let product = products
            .get(&line.product_id)
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        if line.quantity <= 0 {
            return Err(CoreError::InvalidQuantity {
                name: product.name.clone(),
            });
        }

        let total_requested = requested.entry(product.id.as_str()).or_insert(0);
        // Saturates well past any stock level
        let wanted = total_requested.saturating_add(line.quantity);
        if !product.has_stock_for(wanted) {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                in_stock: product.quantity,
                requested: wanted,
            });
        }
        *total_requested = wanted;

        let unit_price = line.unit_price.unwrap_or_else(|| product.retail_price());
        let discount = line.discount.unwrap_or_default();
        validate_non_negative("unit price", unit_price)?;
        validate_non_negative("discount", discount)?;

        lines.push(PreparedLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            barcode: product.barcode.clone(),
            cost_price: product.cost_price(),
            priced: price_line(line.quantity, unit_price, discount)?,
        });
    }

    Ok(lines)
}

fn build_sale(
    invoice_no: i64,
    cashier_id: &str,
    customer_id: Option<String>,
    lines: &[PreparedLine],
    totals: &SaleTotals,
) -> Sale {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let items = lines
        .iter()
        .enumerate()
        .map(|(position, line)| SaleItem {
            sale_id: id.clone(),
            position: position as i64,
            product_id: line.product_id.clone(),
            name_snapshot: line.name.clone(),
            barcode_snapshot: line.barcode.clone(),
            quantity: line.priced.quantity,
            unit_price_cents: line.priced.unit_price.cents(),
            discount_cents: line.priced.discount.cents(),
            discounted_price_cents: line.priced.discounted_price.cents(),
            cost_price_cents: line.cost_price.cents(),
            line_total_cents: line.priced.line_total.cents(),
        })
        .collect();

    Sale {
        id,
        invoice_no,
        sold_at: now,
        subtotal_cents: totals.subtotal.cents(),
        discount_cents: totals.discount.cents(),
        tax_cents: totals.tax.cents(),
        grand_total_cents: totals.grand_total.cents(),
        paid_cents: totals.paid.cents(),
        balance_cents: totals.balance.cents(),
        customer_id: customer_id.filter(|c| !c.trim().is_empty()),
        cashier_id: cashier_id.to_string(),
        created_at: now,
        items,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use inkline_core::{CartLine, ValidationError};

    fn product(id: &str, quantity: i64, retail_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            barcode: format!("BC-{id}"),
            cost_price_cents: retail_cents / 2,
            retail_price_cents: retail_cents,
            quantity,
            grn_number: None,
            category_id: "cat".into(),
            supplier_id: None,
            image_url: None,
            image_public_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(product_id: &str, quantity: i64) -> CartLine {
        CartLine {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
            discount: None,
        }
    }

    fn catalogue(products: Vec<Product>) -> HashMap<String, Product> {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    #[test]
    fn test_prepare_uses_retail_price_by_default() {
        let products = catalogue(vec![product("p", 10, 10000)]);
        let request = SaleRequest {
            items: vec![line("p", 3)],
            ..Default::default()
        };

        let lines = prepare_lines(&request, &products).unwrap();
        assert_eq!(lines[0].priced.unit_price.cents(), 10000);
        assert_eq!(lines[0].priced.line_total.cents(), 30000);
        assert_eq!(lines[0].cost_price.cents(), 5000);
    }

    #[test]
    fn test_prepare_applies_override_and_discount() {
        let products = catalogue(vec![product("p", 10, 10000)]);
        let request = SaleRequest {
            items: vec![CartLine {
                product_id: "p".into(),
                quantity: 2,
                unit_price: Some(Money::from_cents(9000)),
                discount: Some(Money::from_cents(500)),
            }],
            ..Default::default()
        };

        let lines = prepare_lines(&request, &products).unwrap();
        assert_eq!(lines[0].priced.discounted_price.cents(), 8500);
        assert_eq!(lines[0].priced.line_total.cents(), 17000);
    }

    #[test]
    fn test_prepare_reports_unknown_product() {
        let products = catalogue(vec![product("p", 10, 100)]);
        let request = SaleRequest {
            items: vec![line("p", 1), line("ghost", 1)],
            ..Default::default()
        };

        let err = prepare_lines(&request, &products).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "ghost"));
    }

    #[test]
    fn test_prepare_rejects_non_positive_quantity() {
        let products = catalogue(vec![product("p", 10, 100)]);
        let request = SaleRequest {
            items: vec![line("p", 0)],
            ..Default::default()
        };

        let err = prepare_lines(&request, &products).unwrap_err();
        assert_eq!(err.to_string(), "Invalid qty for Product p");
    }

    #[test]
    fn test_prepare_counts_split_lines_against_stock() {
        let products = catalogue(vec![product("p", 5, 100)]);
        let request = SaleRequest {
            items: vec![line("p", 3), line("p", 3)],
            ..Default::default()
        };

        let err = prepare_lines(&request, &products).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                in_stock: 5,
                requested: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_prepare_rejects_negative_line_discount() {
        let products = catalogue(vec![product("p", 5, 100)]);
        let request = SaleRequest {
            items: vec![CartLine {
                discount: Some(Money::from_cents(-1)),
                ..line("p", 1)
            }],
            ..Default::default()
        };

        assert!(matches!(
            prepare_lines(&request, &products),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_build_sale_keeps_cart_order_and_snapshots() {
        let products = catalogue(vec![product("a", 5, 100), product("b", 5, 250)]);
        let request = SaleRequest {
            items: vec![line("b", 1), line("a", 2)],
            ..Default::default()
        };
        let lines = prepare_lines(&request, &products).unwrap();
        let totals = SaleTotals::compute(
            &lines.iter().map(|l| l.priced.line_total).collect::<Vec<_>>(),
            Money::zero(),
            Money::zero(),
            Money::from_cents(500),
        )
        .unwrap();

        let sale = build_sale(7, "cashier", Some(" ".into()), &lines, &totals);

        assert_eq!(sale.invoice_no, 7);
        assert_eq!(sale.customer_id, None);
        assert_eq!(sale.items[0].product_id, "b");
        assert_eq!(sale.items[0].barcode_snapshot, "BC-b");
        assert_eq!(sale.items[1].position, 1);
        assert_eq!(sale.subtotal_cents, 450);
        assert_eq!(sale.balance_cents, -50);
        assert!(sale.items.iter().all(|i| i.sale_id == sale.id));
    }

    #[test]
    fn test_prepare_huge_quantity_is_insufficient_stock() {
        let products = catalogue(vec![product("p", 5, 100)]);
        let request = SaleRequest {
            items: vec![line("p", 1), line("p", i64::MAX)],
            ..Default::default()
        };

        let err = prepare_lines(&request, &products).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                in_stock: 5,
                requested: i64::MAX,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Insufficient stock for Product p (in stock: 5)");
    }

    #[test]
    fn test_prepare_rejects_line_total_overflow() {
        let products = catalogue(vec![product("p", 100_000, 100)]);
        let request = SaleRequest {
            items: vec![CartLine {
                unit_price: Some(Money::from_cents(99_999_999_999_900)),
                ..line("p", 100_000)
            }],
            ..Default::default()
        };

        assert!(matches!(
            prepare_lines(&request, &products),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }
}
