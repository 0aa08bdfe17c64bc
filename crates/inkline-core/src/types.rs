//! # Domain Types
//!
//! Core domain types used throughout Inkline POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Party       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  barcode (uniq) │   │  invoice_no     │   │  code (uniq)    │       │
//! │  │  quantity ≥ 0   │   │  items[]        │   │  purchased      │       │
//! │  │  retail / cost  │   │  grand_total    │   │  paid           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    SaleItem     │   │   PartyKind     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (uniq)    │   │  snapshots of   │   │  Customer       │       │
//! │  │  code           │   │  name/barcode/  │   │  Supplier       │       │
//! │  └─────────────────┘   │  cost price     │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID: (barcode, invoice_no, code) - human-readable
//!
//! All JSON is camelCase for the web client; money fields carry a `Cents`
//! suffix and hold integer minor units.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on the invoice.
    pub name: String,

    /// Barcode scanned at the counter. Unique across products.
    pub barcode: String,

    /// Cost in cents (for profit reporting).
    pub cost_price_cents: i64,

    /// Default selling price in cents.
    pub retail_price_cents: i64,

    /// On-hand quantity. Never negative.
    pub quantity: i64,

    /// Goods received note the stock arrived on.
    pub grn_number: Option<String>,

    pub category_id: String,
    pub supplier_id: Option<String>,

    /// Hosted image location, uploaded by the client.
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,

    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn retail_price(&self) -> Money {
        Money::from_cents(self.retail_price_cents)
    }

    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Point-in-time check against the last read quantity.
    ///
    /// Only the conditional decrement at commit time is authoritative.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub barcode: String,
    pub cost_price: Money,
    pub retail_price: Money,
    pub quantity: i64,
    pub grn_number: Option<String>,
    pub category_id: String,
    pub supplier_id: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

/// A single stock decrement request for the inventory ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: String,
    pub quantity: i64,
}

// =============================================================================
// Category
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub code: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewCategory {
    pub name: String,
    pub code: Option<String>,
}

// =============================================================================
// Customers & Suppliers
// =============================================================================

/// Which ledger a [`Party`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PartyKind {
    Customer,
    Supplier,
}

impl PartyKind {
    /// Entity name used in messages ("Customer not found").
    pub const fn label(&self) -> &'static str {
        match self {
            PartyKind::Customer => "Customer",
            PartyKind::Supplier => "Supplier",
        }
    }
}

/// A customer or supplier with running purchase/payment totals.
///
/// ## Rollup Invariant
/// ```text
/// paid_cents ≤ purchased_cents
///
/// Enforced for manual payments. Sale rollups add the sale's paid amount
/// as-is, so overpaying at the counter can push a customer past it.
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Party {
    pub id: String,
    pub name: String,
    /// External reference code, unique when present.
    pub code: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub purchased_cents: i64,
    pub paid_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Party {
    #[inline]
    pub fn purchased(&self) -> Money {
        Money::from_cents(self.purchased_cents)
    }

    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Amount still owed (purchased minus paid).
    #[inline]
    pub fn outstanding(&self) -> Money {
        self.purchased() - self.paid()
    }
}

pub type Customer = Party;
pub type Supplier = Party;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewParty {
    pub name: String,
    pub code: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale (invoice). Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Customer-facing sequential number.
    pub invoice_no: i64,
    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub grand_total_cents: i64,
    pub paid_cents: i64,
    /// Positive = due, negative = change owed.
    pub balance_cents: i64,
    pub customer_id: Option<String>,
    pub cashier_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Lines in cart order. Loaded separately from `sale_items`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub items: Vec<SaleItem>,
}

impl Sale {
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }

    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleItem {
    pub sale_id: String,
    /// Zero-based position within the cart.
    pub position: i64,
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Barcode at time of sale (frozen).
    pub barcode_snapshot: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// Per-unit discount.
    pub discount_cents: i64,
    /// unit price − discount
    pub discounted_price_cents: i64,
    /// Cost price at time of sale (frozen), for profit.
    pub cost_price_cents: i64,
    /// quantity × discounted price
    pub line_total_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }

    /// (unit − cost) × quantity, before the line discount.
    #[inline]
    pub fn gross_profit(&self) -> Money {
        Money::from_cents(self.unit_price_cents - self.cost_price_cents) * self.quantity
    }
}

// =============================================================================
// Cart Submission
// =============================================================================

/// One line of a submitted cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
    /// Overrides the product's retail price when set.
    pub unit_price: Option<Money>,
    /// Per-unit discount.
    pub discount: Option<Money>,
}

/// A cart submitted for checkout. Amounts are already in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleRequest {
    pub items: Vec<CartLine>,
    pub discount: Option<Money>,
    pub tax: Option<Money>,
    pub paid: Option<Money>,
    pub customer_id: Option<String>,
}

// =============================================================================
// Reporting
// =============================================================================

/// Half-open time window `[start, end)`. An open side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub const fn all_time() -> Self {
        DateRange {
            start: None,
            end: None,
        }
    }

    pub const fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Calendar month (1-12) in UTC. `None` for an invalid month or year.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self::between(midnight(start), midnight(end)))
    }

    /// Calendar year in UTC.
    pub fn year(year: i32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?;
        Some(Self::between(midnight(start), midnight(end)))
    }

    /// The UTC day containing `at`.
    pub fn day_of(at: DateTime<Utc>) -> Self {
        let day = at.date_naive();
        let next = day.succ_opt().unwrap_or(day);
        Self::between(midnight(day), midnight(next))
    }

    /// The UTC calendar month containing `at`.
    pub fn month_of(at: DateTime<Utc>) -> Self {
        Self::month(at.year(), at.month()).unwrap_or_else(Self::all_time)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| at >= s) && self.end.map_or(true, |e| at < e)
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Filters and paging for the invoice list.
#[derive(Debug, Clone, Default)]
pub struct SaleQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    /// Matches invoice number or item name.
    pub search: Option<String>,
    pub range: DateRange,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            (total + i64::from(limit) - 1) / i64::from(limit)
        };
        Pagination {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalePage {
    pub data: Vec<Sale>,
    pub pagination: Pagination,
}

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleStats {
    pub total_invoices: i64,
    pub total_revenue_cents: i64,
    pub total_paid_cents: i64,
    pub total_balance_cents: i64,
    pub avg_invoice_value_cents: i64,
}

/// Stats for one calendar month (1-12) of a yearly report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthStats {
    pub month: u32,
    pub stats: SaleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub sales: Vec<Sale>,
    pub stats: SaleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct YearlyReport {
    pub year: i32,
    pub sales: Vec<Sale>,
    /// Only months with at least one sale, ascending.
    pub monthly_stats: Vec<MonthStats>,
    pub yearly_stats: SaleStats,
}

/// Dashboard tile figures for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PeriodSummary {
    pub total_sales: i64,
    pub sales_amount_cents: i64,
    pub received_amount_cents: i64,
    pub balance_amount_cents: i64,
    pub profit_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardSummary {
    pub overall: PeriodSummary,
    pub monthly: PeriodSummary,
    pub daily: PeriodSummary,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pagination_rounds_pages_up() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
    }

    #[test]
    fn test_date_range_is_half_open() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let range = DateRange::between(start, end);

        assert!(range.contains(start));
        assert!(!range.contains(end));
        assert!(DateRange::all_time().contains(end));
    }

    #[test]
    fn test_calendar_ranges() {
        let december = DateRange::month(2025, 12).unwrap();
        assert_eq!(december.start, Some(Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap()));
        assert_eq!(december.end, Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        assert!(DateRange::month(2026, 13).is_none());
        assert!(DateRange::month(2026, 0).is_none());

        let at = Utc.with_ymd_and_hms(2026, 2, 28, 23, 59, 59).unwrap();
        let day = DateRange::day_of(at);
        assert!(day.contains(at));
        assert_eq!(day.end, Some(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()));
        assert_eq!(DateRange::month_of(at), DateRange::month(2026, 2).unwrap());

        let year = DateRange::year(2026).unwrap();
        assert!(year.contains(at));
    }

    #[test]
    fn test_sale_item_gross_profit_ignores_discount() {
        let item = SaleItem {
            sale_id: "s".into(),
            position: 0,
            product_id: "p".into(),
            name_snapshot: "Toner".into(),
            barcode_snapshot: "123".into(),
            quantity: 2,
            unit_price_cents: 1500,
            discount_cents: 200,
            discounted_price_cents: 1300,
            cost_price_cents: 1000,
            line_total_cents: 2600,
        };
        assert_eq!(item.gross_profit().cents(), 1000);
    }

    #[test]
    fn test_party_outstanding() {
        let now = Utc::now();
        let party = Party {
            id: "c".into(),
            name: "Walk-in".into(),
            code: None,
            phone: None,
            address: None,
            purchased_cents: 150000,
            paid_cents: 50000,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(party.outstanding().cents(), 100000);
    }

    #[test]
    fn test_sale_serializes_camel_case() {
        let now = Utc::now();
        let sale = Sale {
            id: "s".into(),
            invoice_no: 7,
            sold_at: now,
            subtotal_cents: 30000,
            discount_cents: 0,
            tax_cents: 0,
            grand_total_cents: 30000,
            paid_cents: 25000,
            balance_cents: 5000,
            customer_id: None,
            cashier_id: "u".into(),
            created_at: now,
            items: vec![],
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["invoiceNo"], 7);
        assert_eq!(json["grandTotalCents"], 30000);
        assert_eq!(json["balanceCents"], 5000);
    }
}
