//! # Invoice Sequencer
//!
//! Hands out invoice numbers from a named counter row.
//!
//! ## Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  INSERT INTO invoice_counters (name, seq) VALUES ('sale', 1)             │
//! │  ON CONFLICT (name) DO UPDATE SET seq = seq + 1                         │
//! │  RETURNING seq                                                          │
//! │                                                                         │
//! │  First call       → row created, returns 1                              │
//! │  Every later call → returns previous + 1                                │
//! │                                                                         │
//! │  One statement under SQLite's write lock: two callers can never        │
//! │  observe the same value. No read-then-write in application code.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The counter is never reset. Numbers taken by a transaction that later
//! rolls back are returned with it; nothing else ever reuses a number.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use inkline_core::SALE_INVOICE_COUNTER;

/// Allocator for sale invoice numbers.
///
/// ## Usage
/// ```rust,ignore
/// let invoices = InvoiceSequencer::new(pool);
///
/// // Shown on the till before checkout; not reserved
/// let next = invoices.peek().await?;
///
/// // Inside the checkout transaction
/// let invoice_no = InvoiceSequencer::allocate_in(&mut *tx, SALE_INVOICE_COUNTER).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceSequencer {
    pool: SqlitePool,
}

impl InvoiceSequencer {
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceSequencer { pool }
    }

    /// Allocates the next sale invoice number in its own statement.
    pub async fn allocate(&self) -> DbResult<i64> {
        let mut conn = self.pool.acquire().await?;
        Self::allocate_in(&mut *conn, SALE_INVOICE_COUNTER).await
    }

    /// Allocates the next value of `counter` on `conn`.
    ///
    /// Used inside the checkout transaction so a rolled back sale does not
    /// consume a number.
    pub async fn allocate_in(conn: &mut SqliteConnection, counter: &str) -> DbResult<i64> {
        let seq: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO invoice_counters (name, seq) VALUES (?1, 1)
            ON CONFLICT (name) DO UPDATE SET seq = seq + 1
            RETURNING seq
            "#,
        )
        .bind(counter)
        .fetch_one(&mut *conn)
        .await?;

        debug!(counter = %counter, seq, "Allocated invoice number");
        Ok(seq)
    }

    /// The number the next sale would get right now.
    ///
    /// Display hint only: a concurrent checkout may take it first.
    pub async fn peek(&self) -> DbResult<i64> {
        let current: Option<i64> =
            sqlx::query_scalar("SELECT seq FROM invoice_counters WHERE name = ?1")
                .bind(SALE_INVOICE_COUNTER)
                .fetch_optional(&self.pool)
                .await?;

        Ok(current.unwrap_or(0) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_first_allocation_is_one() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let seq = db.invoices();

        assert_eq!(seq.peek().await.unwrap(), 1);
        assert_eq!(seq.allocate().await.unwrap(), 1);
        assert_eq!(seq.allocate().await.unwrap(), 2);
        assert_eq!(seq.peek().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_peek_does_not_mutate() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let seq = db.invoices();

        seq.allocate().await.unwrap();
        assert_eq!(seq.peek().await.unwrap(), 2);
        assert_eq!(seq.peek().await.unwrap(), 2);
        assert_eq!(seq.allocate().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rolled_back_allocation_is_not_kept() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        let n = InvoiceSequencer::allocate_in(&mut *tx, SALE_INVOICE_COUNTER)
            .await
            .unwrap();
        assert_eq!(n, 1);
        tx.rollback().await.unwrap();

        assert_eq!(db.invoices().allocate().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_counters_are_independent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut conn = db.pool().acquire().await.unwrap();

        assert_eq!(InvoiceSequencer::allocate_in(&mut conn, "sale").await.unwrap(), 1);
        assert_eq!(InvoiceSequencer::allocate_in(&mut conn, "grn").await.unwrap(), 1);
        assert_eq!(InvoiceSequencer::allocate_in(&mut conn, "sale").await.unwrap(), 2);
    }
}
