//! # inkline-core: Pure Business Logic for Inkline POS
//!
//! This crate holds the business rules of the shop as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Inkline POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web client (React)                           │   │
//! │  │    Barcode scan ──► Cart ──► Checkout ──► Invoice print         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ inkline-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ line/sale │  │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │  totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    inkline-db (Database Layer)                  │   │
//! │  │        SQLite, stock ledger, invoice counter, checkout          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Customer, etc.)
//! - [`money`] - Money type with integer arithmetic
//! - [`pricing`] - Line and sale totals for checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use inkline_core::money::Money;
//! use inkline_core::pricing::{price_line, SaleTotals};
//!
//! let line = price_line(3, Money::from_cents(10000), Money::zero()).unwrap();
//! let totals = SaleTotals::compute(
//!     &[line.line_total],
//!     Money::zero(),
//!     Money::zero(),
//!     Money::from_cents(25000),
//! )
//! .unwrap();
//!
//! assert_eq!(totals.grand_total.cents(), 30000);
//! assert_eq!(totals.balance.cents(), 5000);
//! ```

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use types::*;

/// Name of the counter row that numbers sale invoices.
pub const SALE_INVOICE_COUNTER: &str = "sale";

/// Maximum distinct lines accepted in a single cart.
pub const MAX_CART_ITEMS: usize = 200;

/// Default page size for invoice listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a page size requested by a client.
pub const MAX_PAGE_SIZE: u32 = 200;
