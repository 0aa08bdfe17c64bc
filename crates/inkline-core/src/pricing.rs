//! # Sale Pricing
//!
//! Pure arithmetic for a checkout: per-line prices and the invoice totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each cart line:                                                    │
//! │    discounted_price = unit_price − line_discount                        │
//! │    line_total       = quantity × discounted_price                       │
//! │                                                                         │
//! │  For the sale:                                                          │
//! │    subtotal    = Σ line_total                                           │
//! │    grand_total = subtotal − discount + tax                              │
//! │    balance     = grand_total − paid                                     │
//! │                                                                         │
//! │  balance > 0  → amount still due                                        │
//! │  balance < 0  → change owed to the customer                             │
//! │  balance = 0  → exact payment                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is in whole cents, so "rounded to 2 decimals" holds without
//! any rounding step here. A figure that would not fit in an `i64` of cents
//! is rejected as `OutOfRange` instead of wrapping.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Line Pricing
// =============================================================================

/// Prices for one cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub quantity: i64,
    pub unit_price: Money,
    /// Per-unit discount.
    pub discount: Money,
    pub discounted_price: Money,
    pub line_total: Money,
}

/// Prices a single cart line.
///
/// ## Example
/// ```rust
/// use inkline_core::money::Money;
/// use inkline_core::pricing::price_line;
///
/// let line = price_line(4, Money::from_cents(250), Money::from_cents(25)).unwrap();
/// assert_eq!(line.discounted_price.cents(), 225);
/// assert_eq!(line.line_total.cents(), 900);
/// ```
pub fn price_line(
    quantity: i64,
    unit_price: Money,
    discount: Money,
) -> Result<PricedLine, ValidationError> {
    let discounted_price = unit_price
        .checked_sub(discount)
        .ok_or_else(|| Money::overflow("discounted price"))?;
    let line_total = discounted_price
        .checked_mul_quantity(quantity)
        .ok_or_else(|| Money::overflow("line total"))?;

    Ok(PricedLine {
        quantity,
        unit_price,
        discount,
        discounted_price,
        line_total,
    })
}

// =============================================================================
// Sale Totals
// =============================================================================

/// Invoice-level figures derived from the priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaleTotals {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub grand_total: Money,
    pub paid: Money,
    pub balance: Money,
}

impl SaleTotals {
    pub fn compute(
        line_totals: &[Money],
        discount: Money,
        tax: Money,
        paid: Money,
    ) -> Result<Self, ValidationError> {
        let subtotal = line_totals
            .iter()
            .try_fold(Money::zero(), |acc, total| acc.checked_add(*total))
            .ok_or_else(|| Money::overflow("subtotal"))?;
        let grand_total = subtotal
            .checked_sub(discount)
            .and_then(|m| m.checked_add(tax))
            .ok_or_else(|| Money::overflow("grand total"))?;
        let balance = grand_total
            .checked_sub(paid)
            .ok_or_else(|| Money::overflow("balance"))?;

        Ok(SaleTotals {
            subtotal,
            discount,
            tax,
            grand_total,
            paid,
            balance,
        })
    }

    /// True when the customer handed over more than the grand total.
    #[inline]
    pub fn owes_change(&self) -> bool {
        self.balance.is_negative()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    #[test]
    fn test_line_without_discount() {
        let line = price_line(3, cents(10000), Money::zero()).unwrap();
        assert_eq!(line.discounted_price, cents(10000));
        assert_eq!(line.line_total, cents(30000));
    }

    #[test]
    fn test_line_with_discount() {
        let line = price_line(3, cents(1999), cents(199)).unwrap();
        assert_eq!(line.discounted_price, cents(1800));
        assert_eq!(line.line_total, cents(5400));
    }

    #[test]
    fn test_overpayment_gives_change() {
        // 3 × 100.00, customer hands over 350.00
        let line = price_line(3, cents(10000), Money::zero()).unwrap();
        let totals =
            SaleTotals::compute(&[line.line_total], Money::zero(), Money::zero(), cents(35000))
                .unwrap();

        assert_eq!(totals.subtotal, cents(30000));
        assert_eq!(totals.grand_total, cents(30000));
        assert_eq!(totals.balance, cents(-5000));
        assert!(totals.owes_change());
    }

    #[test]
    fn test_grand_total_applies_discount_then_tax() {
        let totals = SaleTotals::compute(
            &[cents(12050), cents(7950)],
            cents(1000),
            cents(450),
            cents(5000),
        )
        .unwrap();

        assert_eq!(totals.subtotal, cents(20000));
        assert_eq!(totals.grand_total, cents(19450));
        assert_eq!(totals.balance, cents(14450));
        assert!(!totals.owes_change());
    }

    #[test]
    fn test_exact_payment_leaves_zero_balance() {
        let totals =
            SaleTotals::compute(&[cents(50000)], Money::zero(), Money::zero(), cents(50000))
                .unwrap();
        assert!(totals.balance.is_zero());
    }

    #[test]
    fn test_identities_hold_across_inputs() {
        let lines = [cents(1), cents(333), cents(99999)];
        for discount in [0, 1, 500] {
            for tax in [0, 7, 1200] {
                for paid in [0, 50000, 200000] {
                    let t = SaleTotals::compute(&lines, cents(discount), cents(tax), cents(paid))
                        .unwrap();
                    assert_eq!(t.grand_total, t.subtotal - t.discount + t.tax);
                    assert_eq!(t.balance, t.grand_total - t.paid);
                }
            }
        }
    }

    #[test]
    fn test_line_total_overflow_rejected() {
        // 999,999,999,999.00 × 100,000
        let err = price_line(100_000, cents(99_999_999_999_900), Money::zero()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, .. } if field == "line total"
        ));
    }

    #[test]
    fn test_totals_overflow_rejected() {
        let huge = cents(i64::MAX / 2 + 1);
        let err = SaleTotals::compute(&[huge, huge], Money::zero(), Money::zero(), Money::zero())
            .unwrap_err();
        assert!(err.to_string().starts_with("subtotal must be between"));

        let err = SaleTotals::compute(&[cents(i64::MAX)], Money::zero(), cents(1), Money::zero())
            .unwrap_err();
        assert!(err.to_string().starts_with("grand total must be between"));
    }
}
