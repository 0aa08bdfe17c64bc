//! # Repository Module
//!
//! Database repository implementations for Inkline POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_by_barcode("4790001")                       │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id / get_by_barcode / get_many / list                      │
//! │  ├── insert                                                            │
//! │  ├── decrement_stock (inside a caller's transaction)                   │
//! │  └── add_quantity                                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations that must join a transaction are associated functions taking
//! `&mut SqliteConnection` (pass `&mut *tx`); everything else runs on the
//! pool.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`] - Products and the inventory ledger
//! - [`CategoryRepository`] - Categories with guarded delete
//! - [`CustomerRepository`] / [`SupplierRepository`] - Parties and their running totals
//! - [`InvoiceSequencer`] - Invoice numbers
//! - [`SaleRepository`] - Recorded sales and items
//! - [`ReportRepository`] - Stats, monthly/yearly reports, dashboard
//!
//! [`ProductRepository`]: product::ProductRepository
//! [`CategoryRepository`]: category::CategoryRepository
//! [`CustomerRepository`]: party::CustomerRepository
//! [`SupplierRepository`]: party::SupplierRepository
//! [`InvoiceSequencer`]: invoice::InvoiceSequencer
//! [`SaleRepository`]: sale::SaleRepository
//! [`ReportRepository`]: report::ReportRepository

pub mod category;
pub mod invoice;
pub mod party;
pub mod product;
pub mod report;
pub mod sale;
