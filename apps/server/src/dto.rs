//! Request bodies and query strings as the web client sends them.
//!
//! Amounts arrive as decimal numbers (`250`, `12.5`) and are converted to
//! [`Money`] here, once, before anything else sees them.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use inkline_core::{CartLine, DateRange, Money, SaleQuery, SaleRequest, ValidationError};
use serde::{Deserialize, Serialize};

// =============================================================================
// Sales
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineBody {
    pub product_id: String,
    /// Missing means zero, which checkout rejects by product name.
    #[serde(default)]
    pub qty: i64,
    pub unit_price: Option<f64>,
    pub discount: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleBody {
    #[serde(default)]
    pub items: Vec<CartLineBody>,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
    pub paid_amount: Option<f64>,
    pub customer_id: Option<String>,
}

impl TryFrom<CreateSaleBody> for SaleRequest {
    type Error = ValidationError;

    fn try_from(body: CreateSaleBody) -> Result<Self, Self::Error> {
        let items = body
            .items
            .into_iter()
            .map(|line| {
                Ok(CartLine {
                    product_id: line.product_id,
                    quantity: line.qty,
                    unit_price: optional_money("unitPrice", line.unit_price)?,
                    discount: optional_money("discount", line.discount)?,
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(SaleRequest {
            items,
            discount: optional_money("discount", body.discount)?,
            tax: optional_money("tax", body.tax)?,
            paid: optional_money("paidAmount", body.paid_amount)?,
            customer_id: body.customer_id.filter(|c| !c.trim().is_empty()),
        })
    }
}

fn optional_money(field: &str, amount: Option<f64>) -> Result<Option<Money>, ValidationError> {
    amount.map(|a| Money::from_decimal(field, a)).transpose()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub customer_id: Option<String>,
}

impl TryFrom<SaleListParams> for SaleQuery {
    type Error = ValidationError;

    fn try_from(params: SaleListParams) -> Result<Self, Self::Error> {
        Ok(SaleQuery {
            page: params.page.unwrap_or(1),
            limit: params.limit.unwrap_or(0),
            search: params.search,
            range: DateParams {
                start_date: params.start_date,
                end_date: params.end_date,
            }
            .into_range()?,
            customer_id: params.customer_id.filter(|c| !c.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateParams {
    /// `startDate` and `endDate` accept RFC 3339 or `YYYY-MM-DD`. A bare
    /// end date covers that whole day.
    pub fn into_range(self) -> Result<DateRange, ValidationError> {
        let start = self
            .start_date
            .as_deref()
            .map(|s| parse_bound("startDate", s, false))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|s| parse_bound("endDate", s, true))
            .transpose()?;

        Ok(DateRange { start, end })
    }
}

fn parse_bound(field: &str, raw: &str, is_end: bool) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD or RFC 3339".to_string(),
        }
    })?;
    let date = if is_end {
        date.succ_opt().ok_or_else(|| ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "date out of range".to_string(),
        })?
    } else {
        date
    };

    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PeriodParams {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl PeriodParams {
    /// Missing values default to the current year and month.
    pub fn year_or_current(&self, now: DateTime<Utc>) -> i32 {
        self.year.unwrap_or_else(|| now.year())
    }

    pub fn month_or_current(&self, now: DateTime<Utc>) -> u32 {
        self.month.unwrap_or_else(|| now.month())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NextInvoice {
    pub next: i64,
}

// =============================================================================
// Parties and stock
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct AmountBody {
    pub amount: f64,
}

impl AmountBody {
    pub fn money(&self) -> Result<Money, ValidationError> {
        Money::from_decimal("amount", self.amount)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuantityBody {
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_body_converts_decimals() {
        let body: CreateSaleBody = serde_json::from_str(
            r#"{
                "items": [{ "productId": "p1", "qty": 3, "discount": 0.5 }],
                "paidAmount": 250,
                "customerId": ""
            }"#,
        )
        .unwrap();

        let request = SaleRequest::try_from(body).unwrap();
        assert_eq!(request.items[0].quantity, 3);
        assert_eq!(request.items[0].unit_price, None);
        assert_eq!(request.items[0].discount, Some(Money::from_cents(50)));
        assert_eq!(request.paid, Some(Money::from_cents(25000)));
        assert_eq!(request.customer_id, None);
    }

    #[test]
    fn test_missing_qty_defaults_to_zero() {
        let body: CreateSaleBody =
            serde_json::from_str(r#"{ "items": [{ "productId": "p1" }] }"#).unwrap();

        let request = SaleRequest::try_from(body).unwrap();
        assert_eq!(request.items[0].quantity, 0);
    }

    #[test]
    fn test_sale_body_rejects_non_finite_amount() {
        let body = CreateSaleBody {
            items: vec![],
            discount: Some(f64::INFINITY),
            tax: None,
            paid_amount: None,
            customer_id: None,
        };
        assert!(SaleRequest::try_from(body).is_err());
    }

    #[test]
    fn test_bare_end_date_covers_whole_day() {
        let range = DateParams {
            start_date: Some("2025-03-01".into()),
            end_date: Some("2025-03-31".into()),
        }
        .into_range()
        .unwrap();

        assert_eq!(range, DateRange::month(2025, 3).unwrap());
    }

    #[test]
    fn test_rfc3339_bounds_used_as_given() {
        let range = DateParams {
            start_date: Some("2025-03-01T10:00:00+05:30".into()),
            end_date: None,
        }
        .into_range()
        .unwrap();

        assert_eq!(range.start.unwrap().to_rfc3339(), "2025-03-01T04:30:00+00:00");
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = DateParams {
            start_date: Some("01/03/2025".into()),
            end_date: None,
        }
        .into_range()
        .unwrap_err();
        assert!(err.to_string().starts_with("startDate has invalid format"));
    }
}
