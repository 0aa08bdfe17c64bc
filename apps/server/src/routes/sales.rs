//! Sale entry and invoice lookups.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use inkline_core::{MonthlyReport, Sale, SalePage, SaleQuery, SaleRequest, SaleStats, YearlyReport};

use crate::auth::Cashier;
use crate::dto::{CreateSaleBody, DateParams, NextInvoice, PeriodParams, SaleListParams};
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sales).post(create_sale))
        .route("/next", get(next_invoice))
        .route("/stats", get(stats))
        .route("/monthly", get(monthly))
        .route("/yearly", get(yearly))
        .route("/{id}", get(get_sale))
}

/// Records a sale for the authenticated cashier.
///
/// On `409 STOCK_CONFLICT` the client resubmits the whole cart.
pub async fn create_sale(
    State(state): State<AppState>,
    Cashier(cashier_id): Cashier,
    AppJson(body): AppJson<CreateSaleBody>,
) -> Result<(StatusCode, Json<Sale>), ApiError> {
    let request = SaleRequest::try_from(body)?;
    let sale = state.db.checkout().create_sale(&cashier_id, request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

/// The number the next sale will most likely get. Display only.
pub async fn next_invoice(State(state): State<AppState>) -> Result<Json<NextInvoice>, ApiError> {
    let next = state.db.invoices().peek().await?;
    Ok(Json(NextInvoice { next }))
}

pub async fn list_sales(
    State(state): State<AppState>,
    Query(params): Query<SaleListParams>,
) -> Result<Json<SalePage>, ApiError> {
    let query = SaleQuery::try_from(params)?;
    Ok(Json(state.db.sales().list(&query).await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Sale>, ApiError> {
    state
        .db
        .sales()
        .get_with_items(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Sale", &id))
}

pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> Result<Json<SaleStats>, ApiError> {
    let range = params.into_range()?;
    Ok(Json(state.db.reports().stats(range).await?))
}

pub async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<MonthlyReport>, ApiError> {
    let now = Utc::now();
    let report = state
        .db
        .reports()
        .monthly(params.year_or_current(now), params.month_or_current(now))
        .await?;
    Ok(Json(report))
}

pub async fn yearly(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Result<Json<YearlyReport>, ApiError> {
    let report = state
        .db
        .reports()
        .yearly(params.year_or_current(Utc::now()))
        .await?;
    Ok(Json(report))
}
