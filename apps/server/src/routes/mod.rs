//! HTTP routes, all under `/api`.
//!
//! ```text
//! /api/health                              public
//! /api/sales          POST, GET            bearer token
//! /api/sales/next|stats|monthly|yearly     bearer token
//! /api/sales/{id}                          bearer token
//! /api/analytics/dashboard                 bearer token
//! /api/customers/{id}/payments             bearer token
//! /api/suppliers/{id}/payments|purchases   bearer token
//! /api/products/{id}/quantity              bearer token
//! /api/products/barcode/{barcode}          bearer token
//! ```

use axum::middleware;
use axum::routing::get;
use axum::Router;

use crate::auth::require_auth;
use crate::state::AppState;

pub mod analytics;
pub mod health;
pub mod parties;
pub mod products;
pub mod sales;

pub fn router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .nest("/sales", sales::router())
        .nest("/analytics", analytics::router())
        .nest("/customers", parties::customers_router())
        .nest("/suppliers", parties::suppliers_router())
        .nest("/products", products::router())
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/health", get(health::health))
        .merge(protected)
}
