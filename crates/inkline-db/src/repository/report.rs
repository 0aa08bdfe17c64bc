//! # Report Repository
//!
//! Read-only aggregates over the sale ledger: invoice stats, monthly and
//! yearly reports, and the dashboard tiles.
//!
//! ## Periods
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  All periods are half-open UTC windows [start, end):                   │
//! │                                                                         │
//! │  daily    [today 00:00,        tomorrow 00:00)                         │
//! │  monthly  [1st of month 00:00, 1st of next month 00:00)                │
//! │  yearly   [Jan 1 00:00,        Jan 1 next year 00:00)                  │
//! │  overall  unbounded                                                    │
//! │                                                                         │
//! │  A sale at exactly midnight belongs to the day that starts there.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::sale::SaleRepository;
use inkline_core::{
    DashboardSummary, DateRange, MonthStats, MonthlyReport, PeriodSummary, SaleStats,
    ValidationError, YearlyReport,
};

const STATS_SELECT: &str = "COUNT(*) AS total_invoices, \
     COALESCE(SUM(grand_total_cents), 0) AS total_revenue_cents, \
     COALESCE(SUM(paid_cents), 0) AS total_paid_cents, \
     COALESCE(SUM(balance_cents), 0) AS total_balance_cents, \
     CAST(ROUND(COALESCE(AVG(grand_total_cents), 0)) AS INTEGER) AS avg_invoice_value_cents";

const RANGE_FILTER: &str = "(?1 IS NULL OR sold_at >= ?1) AND (?2 IS NULL OR sold_at < ?2)";

#[derive(Debug, sqlx::FromRow)]
struct MonthRow {
    month: i64,
    total_invoices: i64,
    total_revenue_cents: i64,
    total_paid_cents: i64,
    total_balance_cents: i64,
    avg_invoice_value_cents: i64,
}

impl From<MonthRow> for MonthStats {
    fn from(row: MonthRow) -> Self {
        MonthStats {
            month: row.month as u32,
            stats: SaleStats {
                total_invoices: row.total_invoices,
                total_revenue_cents: row.total_revenue_cents,
                total_paid_cents: row.total_paid_cents,
                total_balance_cents: row.total_balance_cents,
                avg_invoice_value_cents: row.avg_invoice_value_cents,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Totals over the sales in `range`. An empty range yields all zeros.
    pub async fn stats(&self, range: DateRange) -> DbResult<SaleStats> {
        let sql = format!("SELECT {STATS_SELECT} FROM sales WHERE {RANGE_FILTER}");
        let stats = sqlx::query_as::<_, SaleStats>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_one(&self.pool)
            .await?;

        Ok(stats)
    }

    /// Sales and totals for one calendar month.
    pub async fn monthly(&self, year: i32, month: u32) -> DbResult<MonthlyReport> {
        let range = DateRange::month(year, month).ok_or_else(|| ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        })?;

        debug!(year, month, "Building monthly report");

        Ok(MonthlyReport {
            year,
            month,
            sales: self.sales().list_in_range(range).await?,
            stats: self.stats(range).await?,
        })
    }

    /// Sales, per-month totals and year totals for one calendar year.
    pub async fn yearly(&self, year: i32) -> DbResult<YearlyReport> {
        let range = DateRange::year(year).ok_or_else(|| ValidationError::InvalidFormat {
            field: "year".to_string(),
            reason: "out of supported range".to_string(),
        })?;

        debug!(year, "Building yearly report");

        let sql = format!(
            "SELECT CAST(substr(sold_at, 6, 2) AS INTEGER) AS month, {STATS_SELECT} \
             FROM sales WHERE {RANGE_FILTER} \
             GROUP BY month ORDER BY month"
        );
        let monthly_stats = sqlx::query_as::<_, MonthRow>(&sql)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(MonthStats::from)
            .collect();

        Ok(YearlyReport {
            year,
            sales: self.sales().list_in_range(range).await?,
            monthly_stats,
            yearly_stats: self.stats(range).await?,
        })
    }

    /// Dashboard tiles for all time, the month of `now` and the day of `now`.
    pub async fn dashboard_summary(&self, now: DateTime<Utc>) -> DbResult<DashboardSummary> {
        Ok(DashboardSummary {
            overall: self.period_summary(DateRange::all_time()).await?,
            monthly: self.period_summary(DateRange::month_of(now)).await?,
            daily: self.period_summary(DateRange::day_of(now)).await?,
        })
    }

    /// Figures for one dashboard tile.
    ///
    /// Profit is Σ (unit price − cost price) × quantity over the items,
    /// before line and invoice discounts.
    pub async fn period_summary(&self, range: DateRange) -> DbResult<PeriodSummary> {
        let stats = self.stats(range).await?;

        let profit_cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM((si.unit_price_cents - si.cost_price_cents) * si.quantity), 0)
            FROM sale_items si
            JOIN sales ON sales.id = si.sale_id
            WHERE (?1 IS NULL OR sales.sold_at >= ?1) AND (?2 IS NULL OR sales.sold_at < ?2)
            "#,
        )
        .bind(range.start)
        .bind(range.end)
        .fetch_one(&self.pool)
        .await?;

        Ok(PeriodSummary {
            total_sales: stats.total_invoices,
            sales_amount_cents: stats.total_revenue_cents,
            received_amount_cents: stats.total_paid_cents,
            balance_amount_cents: stats.total_balance_cents,
            profit_cents,
        })
    }
}
