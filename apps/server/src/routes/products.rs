use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use inkline_core::Product;
use tracing::info;

use crate::auth::Cashier;
use crate::dto::QuantityBody;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/barcode/{barcode}", get(get_by_barcode))
        .route("/{id}/quantity", post(add_quantity))
}

/// Barcode scan at the till.
pub async fn get_by_barcode(
    State(state): State<AppState>,
    Path(barcode): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .db
        .products()
        .get_by_barcode(&barcode)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", &barcode))
}

/// Restock (positive) or correction (negative).
pub async fn add_quantity(
    State(state): State<AppState>,
    Cashier(cashier_id): Cashier,
    Path(id): Path<String>,
    AppJson(body): AppJson<QuantityBody>,
) -> Result<Json<Product>, ApiError> {
    let product = state.db.products().add_quantity(&id, body.amount).await?;
    info!(
        product_id = %id,
        amount = body.amount,
        quantity = product.quantity,
        cashier_id = %cashier_id,
        "Stock adjusted"
    );
    Ok(Json(product))
}
