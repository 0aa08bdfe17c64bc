//! # Validation Module
//!
//! Input validation utilities for Inkline POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Web client                                                   │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (apps/server)                                   │
//! │  ├── Deserialization, decimal → cents                                  │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0)                                             │
//! │  ├── UNIQUE barcode / invoice_no / name                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inkline_core::money::Money;
//! use inkline_core::validation::{validate_barcode, validate_payment_amount};
//!
//! validate_barcode("4790001234567").unwrap();
//! assert!(validate_payment_amount(Money::zero()).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_CART_ITEMS, MAX_PAGE_SIZE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_BARCODE_LEN: usize = 64;
const MAX_CODE_LEN: usize = 32;
const MAX_SEARCH_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required display name (product, category, customer, supplier).
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use inkline_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Glossy A4  ").unwrap(), "Glossy A4");
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a product barcode.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - No whitespace (scanners emit a single token)
pub fn validate_barcode(barcode: &str) -> ValidationResult<String> {
    let barcode = barcode.trim();

    if barcode.is_empty() {
        return Err(ValidationError::required("barcode"));
    }

    if barcode.len() > MAX_BARCODE_LEN {
        return Err(ValidationError::TooLong {
            field: "barcode".to_string(),
            max: MAX_BARCODE_LEN,
        });
    }

    if barcode.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(barcode.to_string())
}

/// Normalizes an optional external code (customer/supplier/category code).
///
/// Blank input becomes `None` so it does not collide on the unique index.
pub fn normalize_code(code: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(None);
    };

    if code.len() > MAX_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: MAX_CODE_LEN,
        });
    }

    Ok(Some(code.to_string()))
}

/// Validates a search query.
///
/// ## Returns
/// The trimmed query, or `None` when blank.
pub fn validate_search_query(query: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(None);
    };

    if query.len() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(Some(query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an on-hand quantity for a new product (zero allowed).
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity handed to the inventory ledger.
///
/// ## Rules
/// - Must be positive (> 0)
pub fn validate_decrement_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price, discount or tax amount.
///
/// ## Example
/// ```rust
/// use inkline_core::money::Money;
/// use inkline_core::validation::validate_non_negative;
///
/// assert!(validate_non_negative("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_non_negative("price", Money::zero()).is_ok());
/// assert!(validate_non_negative("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a manual payment or purchase adjustment.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Customer page: Add Payment                                             │
/// │                                                                         │
/// │  User enters amount: 50.00                                             │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_payment_amount(5000) ← THIS FUNCTION                         │
/// │       │                                                                 │
/// │       ├── amount <= 0? → Error: "amount must be positive"              │
/// │       │                                                                 │
/// │       └── OK → conditional update (paid + amount ≤ purchased)          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_payment_amount(amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of lines in a submitted cart.
///
/// An empty cart is reported separately by checkout.
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

/// Clamps paging input: page is 1-based, limit within `1..=MAX_PAGE_SIZE`.
pub fn normalize_paging(page: u32, limit: u32) -> (u32, u32) {
    let page = page.max(1);
    let limit = if limit == 0 {
        crate::DEFAULT_PAGE_SIZE
    } else {
        limit.min(MAX_PAGE_SIZE)
    };
    (page, limit)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Business Cards").unwrap(), "Business Cards");
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode(" 4790001 ").unwrap(), "4790001");
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("479 0001").is_err());
        assert!(validate_barcode(&"9".repeat(65)).is_err());
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(None).unwrap(), None);
        assert_eq!(normalize_code(Some("  ")).unwrap(), None);
        assert_eq!(normalize_code(Some(" C-001 ")).unwrap(), Some("C-001".to_string()));
        assert!(normalize_code(Some(&"X".repeat(40))).is_err());
    }

    #[test]
    fn test_quantities() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
        assert!(validate_decrement_quantity(1).is_ok());
        assert!(validate_decrement_quantity(0).is_err());
    }

    #[test]
    fn test_validate_payment_amount() {
        assert!(validate_payment_amount(Money::from_cents(1)).is_ok());
        assert!(validate_payment_amount(Money::zero()).is_err());
        assert!(validate_payment_amount(Money::from_cents(-500)).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS).is_ok());
        assert!(validate_cart_size(MAX_CART_ITEMS + 1).is_err());
    }

    #[test]
    fn test_normalize_paging() {
        assert_eq!(normalize_paging(0, 0), (1, crate::DEFAULT_PAGE_SIZE));
        assert_eq!(normalize_paging(3, 25), (3, 25));
        assert_eq!(normalize_paging(1, 10_000), (1, MAX_PAGE_SIZE));
    }

    #[test]
    fn test_search_query() {
        assert_eq!(validate_search_query(Some("  ")).unwrap(), None);
        assert_eq!(validate_search_query(Some(" 42 ")).unwrap(), Some("42".to_string()));
        assert!(validate_search_query(Some(&"q".repeat(101))).is_err());
    }
}
