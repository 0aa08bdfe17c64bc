//! # Error Types
//!
//! Domain-specific error types for inkline-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inkline-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  inkline-db errors (separate crate)                                    │
//! │  └── DbError          - Database failures, wraps CoreError             │
//! │                                                                         │
//! │  HTTP errors (apps/server)                                             │
//! │  └── ApiError         - What the web client sees (status + message)    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Display` text of each variant is the message shown to the cashier,
//! so wording here is user-facing.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while selling, restocking or settling
/// balances.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A sale was submitted without any lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// A cart line references a product id that does not resolve.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A cart line asks for zero or a negative quantity.
    #[error("Invalid qty for {name}")]
    InvalidQuantity { name: String },

    /// Pre-check found fewer units on hand than requested.
    ///
    /// ## User Workflow
    /// ```text
    /// Cart line (qty: 5)
    ///      │
    ///      ▼
    /// Check stock: on hand = 3
    ///      │
    ///      ▼
    /// InsufficientStock { name: "A4 Copy Paper", in_stock: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for A4 Copy Paper (in stock: 3)"
    /// ```
    #[error("Insufficient stock for {name} (in stock: {in_stock})")]
    InsufficientStock {
        name: String,
        in_stock: i64,
        requested: i64,
    },

    /// The conditional stock decrement modified fewer products than the cart
    /// has lines: a concurrent sale won the race. The whole cart must be
    /// resubmitted.
    #[error("Stock update conflict. Try again.")]
    StockConflict { requested: usize, applied: u64 },

    /// A restock adjustment would leave the on-hand quantity below zero.
    #[error("Quantity cannot be negative")]
    NegativeStock { product_id: String },

    /// A payment would take the paid total above the purchased total.
    #[error("Paid amount cannot exceed purchased amount (purchased {purchased}, would be {attempted})")]
    PaymentExceedsPurchased { purchased: Money, attempted: Money },

    /// Deletion refused because other records still reference the entity.
    #[error("Cannot delete: {entity} used by {dependents} product(s)")]
    InUse { entity: String, dependents: i64 },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for failures caused by a concurrent writer rather than by the
    /// request itself. Resubmitting the same request may succeed.
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::StockConflict { .. })
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic or storage access runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, non-finite amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate barcode).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        ValidationError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            name: "A4 Copy Paper".to_string(),
            in_stock: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for A4 Copy Paper (in stock: 3)"
        );
    }

    #[test]
    fn test_stock_conflict_message_is_generic() {
        let err = CoreError::StockConflict {
            requested: 2,
            applied: 1,
        };
        assert_eq!(err.to_string(), "Stock update conflict. Try again.");
        assert!(err.is_conflict());
        assert!(!CoreError::EmptyCart.is_conflict());
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("barcode").to_string(), "barcode is required");
        assert_eq!(
            ValidationError::duplicate("barcode", "4790001").to_string(),
            "barcode '4790001' already exists"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.to_string(), "name is required");
    }
}
