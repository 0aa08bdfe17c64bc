//! Customer and supplier balance movements.

use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use inkline_core::Party;
use tracing::info;

use crate::dto::AmountBody;
use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn customers_router() -> Router<AppState> {
    Router::new().route("/{id}/payments", post(customer_payment))
}

pub fn suppliers_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/payments", post(supplier_payment))
        .route("/{id}/purchases", post(supplier_purchase))
}

/// Settles part of a customer's outstanding balance.
pub async fn customer_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<AmountBody>,
) -> Result<Json<Party>, ApiError> {
    let customer = state.db.customers().add_payment(&id, body.money()?).await?;
    info!(customer_id = %id, paid = customer.paid_cents, "Customer payment recorded");
    Ok(Json(customer))
}

pub async fn supplier_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<AmountBody>,
) -> Result<Json<Party>, ApiError> {
    let supplier = state.db.suppliers().add_payment(&id, body.money()?).await?;
    info!(supplier_id = %id, paid = supplier.paid_cents, "Supplier payment recorded");
    Ok(Json(supplier))
}

pub async fn supplier_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<AmountBody>,
) -> Result<Json<Party>, ApiError> {
    let supplier = state.db.suppliers().add_purchase(&id, body.money()?).await?;
    info!(
        supplier_id = %id,
        purchased = supplier.purchased_cents,
        "Supplier purchase recorded"
    );
    Ok(Json(supplier))
}
