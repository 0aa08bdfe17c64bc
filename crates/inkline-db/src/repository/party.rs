//! # Customer & Supplier Repositories
//!
//! Customers and suppliers share one shape: a name, an optional unique code
//! and two running totals.
//!
//! ## Running Totals
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Moves Which Total                                │
//! │                                                                         │
//! │  Customer                                                              │
//! │    purchased += sale grand total   (checkout rollup, best-effort)      │
//! │    paid      += sale paid amount   (checkout rollup, best-effort)      │
//! │    paid      += manual payment     (guarded: paid ≤ purchased)         │
//! │                                                                         │
//! │  Supplier                                                              │
//! │    purchased += manual purchase    (unconditional)                     │
//! │    paid      += manual payment     (guarded: paid ≤ purchased)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every change is a single relative `UPDATE ... SET x = x + ?`, so
//! concurrent adjustments commute and none is lost.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use inkline_core::validation::{
    normalize_code, validate_name, validate_payment_amount, validate_search_query,
};
use inkline_core::{CoreError, Money, NewParty, Party, PartyKind, ValidationError};

const PARTY_COLUMNS: &str =
    "id, name, code, phone, address, purchased_cents, paid_cents, created_at, updated_at";

// =============================================================================
// Shared table access
// =============================================================================

/// Queries common to both ledgers, parameterised by table.
#[derive(Debug, Clone)]
struct PartyTable {
    pool: SqlitePool,
    kind: PartyKind,
}

impl PartyTable {
    fn table(&self) -> &'static str {
        match self.kind {
            PartyKind::Customer => "customers",
            PartyKind::Supplier => "suppliers",
        }
    }

    fn not_found(&self, id: &str) -> DbError {
        DbError::not_found(self.kind.label(), id)
    }

    async fn create(&self, input: NewParty) -> DbResult<Party> {
        let name = validate_name(&input.name)?;
        let code = normalize_code(input.code.as_deref())?;

        if let Some(code) = &code {
            let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE code = ?1)", self.table());
            let taken: bool = sqlx::query_scalar(&sql)
                .bind(code)
                .fetch_one(&self.pool)
                .await?;
            if taken {
                return Err(ValidationError::duplicate("code", code.as_str()).into());
            }
        }

        let now = Utc::now();
        let party = Party {
            id: Uuid::new_v4().to_string(),
            name,
            code,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            address: input.address.filter(|a| !a.trim().is_empty()),
            purchased_cents: 0,
            paid_cents: 0,
            created_at: now,
            updated_at: now,
        };

        debug!(kind = ?self.kind, id = %party.id, "Creating party");

        let sql = format!(
            "INSERT INTO {} ({PARTY_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            self.table()
        );
        sqlx::query(&sql)
            .bind(&party.id)
            .bind(&party.name)
            .bind(&party.code)
            .bind(&party.phone)
            .bind(&party.address)
            .bind(party.purchased_cents)
            .bind(party.paid_cents)
            .bind(party.created_at)
            .bind(party.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(party)
    }

    async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        let sql = format!("SELECT {PARTY_COLUMNS} FROM {} WHERE id = ?1", self.table());
        let party = sqlx::query_as::<_, Party>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(party)
    }

    async fn require(&self, id: &str) -> DbResult<Party> {
        self.get_by_id(id).await?.ok_or_else(|| self.not_found(id))
    }

    async fn list(&self, search: Option<&str>) -> DbResult<Vec<Party>> {
        let pattern = validate_search_query(search)?.map(|q| format!("%{q}%"));

        let sql = format!(
            "SELECT {PARTY_COLUMNS} FROM {} \
             WHERE (?1 IS NULL OR name LIKE ?1 OR code LIKE ?1 OR phone LIKE ?1) \
             ORDER BY name",
            self.table()
        );
        let parties = sqlx::query_as::<_, Party>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(parties)
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", self.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(self.not_found(id));
        }

        debug!(kind = ?self.kind, id = %id, "Deleted party");
        Ok(())
    }

    /// Guarded payment: `paid + amount` must stay within `purchased`.
    ///
    /// One conditional update; a zero-row result is disambiguated by
    /// re-reading the row.
    async fn add_payment(&self, id: &str, amount: Money) -> DbResult<Party> {
        validate_payment_amount(amount)?;

        debug!(kind = ?self.kind, id = %id, amount = amount.cents(), "Adding payment");

        let sql = format!(
            "UPDATE {} SET paid_cents = paid_cents + ?2, updated_at = ?3 \
             WHERE id = ?1 AND paid_cents + ?2 <= purchased_cents",
            self.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(amount.cents())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let current = self.require(id).await?;
            return Err(CoreError::PaymentExceedsPurchased {
                purchased: current.purchased(),
                attempted: current.paid() + amount,
            }
            .into());
        }

        self.require(id).await
    }

    /// Unconditional relative increment of both totals.
    ///
    /// Returns false when no row has this id.
    async fn increment_totals(&self, id: &str, purchased: Money, paid: Money) -> DbResult<bool> {
        let sql = format!(
            "UPDATE {} SET purchased_cents = purchased_cents + ?2, \
             paid_cents = paid_cents + ?3, updated_at = ?4 WHERE id = ?1",
            self.table()
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(purchased.cents())
            .bind(paid.cents())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone)]
pub struct CustomerRepository {
    inner: PartyTable,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository {
            inner: PartyTable {
                pool,
                kind: PartyKind::Customer,
            },
        }
    }

    pub async fn create(&self, input: NewParty) -> DbResult<Party> {
        self.inner.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        self.inner.get_by_id(id).await
    }

    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Party>> {
        self.inner.list(search).await
    }

    /// Sales keep a plain `customer_id`, so deleting a customer never
    /// touches recorded invoices.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.inner.delete(id).await
    }

    /// Records a payment against the customer's outstanding balance.
    ///
    /// ## Returns
    /// * `Err(ValidationError::MustBePositive)` - amount ≤ 0
    /// * `Err(CoreError::PaymentExceedsPurchased)` - would overpay
    /// * `Err(DbError::NotFound)` - No such customer
    pub async fn add_payment(&self, id: &str, amount: Money) -> DbResult<Party> {
        self.inner.add_payment(id, amount).await
    }

    /// Adds a committed sale to the customer's running totals.
    ///
    /// Called by checkout after the sale is committed. Returns whether a
    /// customer row was updated.
    pub async fn apply_sale_rollup(&self, id: &str, grand_total: Money, paid: Money) -> DbResult<bool> {
        self.inner.increment_totals(id, grand_total, paid).await
    }
}

// =============================================================================
// Suppliers
// =============================================================================

#[derive(Debug, Clone)]
pub struct SupplierRepository {
    inner: PartyTable,
}

impl SupplierRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository {
            inner: PartyTable {
                pool,
                kind: PartyKind::Supplier,
            },
        }
    }

    pub async fn create(&self, input: NewParty) -> DbResult<Party> {
        self.inner.create(input).await
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Party>> {
        self.inner.get_by_id(id).await
    }

    pub async fn list(&self, search: Option<&str>) -> DbResult<Vec<Party>> {
        self.inner.list(search).await
    }

    /// Deletes a supplier no product references.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let dependents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE supplier_id = ?1")
            .bind(id)
            .fetch_one(&self.inner.pool)
            .await?;

        if dependents > 0 {
            return Err(CoreError::InUse {
                entity: "supplier".to_string(),
                dependents,
            }
            .into());
        }

        self.inner.delete(id).await
    }

    /// Records a payment made to the supplier.
    pub async fn add_payment(&self, id: &str, amount: Money) -> DbResult<Party> {
        self.inner.add_payment(id, amount).await
    }

    /// Records goods bought from the supplier. No upper bound.
    pub async fn add_purchase(&self, id: &str, amount: Money) -> DbResult<Party> {
        validate_payment_amount(amount)?;

        debug!(id = %id, amount = amount.cents(), "Adding supplier purchase");

        if !self.inner.increment_totals(id, amount, Money::zero()).await? {
            return Err(self.inner.not_found(id));
        }

        self.inner.require(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn acme(code: Option<&str>) -> NewParty {
        NewParty {
            name: "Acme Traders".into(),
            code: code.map(String::from),
            phone: Some("0771234567".into()),
            address: None,
        }
    }

    #[tokio::test]
    async fn test_customer_code_unique_when_present() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customers = db.customers();

        customers.create(acme(Some("C-1"))).await.unwrap();
        customers.create(acme(None)).await.unwrap();
        customers.create(acme(Some("  "))).await.unwrap();

        let err = customers.create(acme(Some("C-1"))).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::Validation(ValidationError::Duplicate { .. }))
        ));
        assert_eq!(customers.list(None).await.unwrap().len(), 3);

        // Codes live in separate tables
        db.suppliers().create(acme(Some("C-1"))).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_rejected_when_fully_paid() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customers = db.customers();
        let c = customers.create(acme(None)).await.unwrap();

        customers
            .apply_sale_rollup(&c.id, Money::from_cents(50000), Money::from_cents(50000))
            .await
            .unwrap();

        let err = customers
            .add_payment(&c.id, Money::from_cents(5000))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::PaymentExceedsPurchased { .. })
        ));

        let after = customers.get_by_id(&c.id).await.unwrap().unwrap();
        assert_eq!(after.paid_cents, 50000);
    }

    #[tokio::test]
    async fn test_payment_up_to_purchased() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customers = db.customers();
        let c = customers.create(acme(None)).await.unwrap();
        customers
            .apply_sale_rollup(&c.id, Money::from_cents(10000), Money::from_cents(2500))
            .await
            .unwrap();

        let updated = customers
            .add_payment(&c.id, Money::from_cents(7500))
            .await
            .unwrap();
        assert_eq!(updated.paid_cents, 10000);
        assert!(updated.outstanding().is_zero());
    }

    #[tokio::test]
    async fn test_payment_validation_and_missing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let c = db.customers().create(acme(None)).await.unwrap();

        let err = db.customers().add_payment(&c.id, Money::zero()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        let err = db
            .customers()
            .add_payment("ghost", Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rollup_reports_missing_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let updated = db
            .customers()
            .apply_sale_rollup("ghost", Money::from_cents(100), Money::zero())
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_supplier_purchase_then_payment() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let suppliers = db.suppliers();
        let s = suppliers.create(acme(Some("S-1"))).await.unwrap();

        let s1 = suppliers.add_purchase(&s.id, Money::from_cents(120000)).await.unwrap();
        assert_eq!(s1.purchased_cents, 120000);

        let s2 = suppliers.add_payment(&s.id, Money::from_cents(20000)).await.unwrap();
        assert_eq!(s2.paid_cents, 20000);

        let err = suppliers
            .add_payment(&s.id, Money::from_cents(100001))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::PaymentExceedsPurchased { .. })
        ));

        let err = suppliers.add_purchase(&s.id, Money::zero()).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));

        let err = suppliers
            .add_purchase("ghost", Money::from_cents(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let c = db.customers().create(acme(None)).await.unwrap();

        db.customers().delete(&c.id).await.unwrap();
        assert!(db.customers().get_by_id(&c.id).await.unwrap().is_none());
    }
}
