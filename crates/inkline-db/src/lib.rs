//! # inkline-db: Database Layer for Inkline POS
//!
//! SQLite storage for the shop and the checkout transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Inkline POS Data Flow                             │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    inkline-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ SaleRepo      │    │   _schema    │  │   │
//! │  │   │               │    │ ReportRepo    │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │            ▲                   ▲                                │   │
//! │  │            └──── CheckoutService (checkout.rs) ────┘            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Products, categories, parties, invoices, sales, reports
//! - [`checkout`] - The sale transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use inkline_core::{CartLine, SaleRequest};
//! use inkline_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("inkline.db")).await?;
//!
//! let sale = db
//!     .checkout()
//!     .create_sale("cashier-1", SaleRequest {
//!         items: vec![CartLine { product_id, quantity: 2, unit_price: None, discount: None }],
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Invoice #{}", sale.invoice_no);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::category::CategoryRepository;
pub use repository::invoice::InvoiceSequencer;
pub use repository::party::{CustomerRepository, SupplierRepository};
pub use repository::product::{ProductFilter, ProductRepository};
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
