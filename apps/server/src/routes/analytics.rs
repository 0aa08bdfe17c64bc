use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use inkline_core::DashboardSummary;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

/// All-time, this month and today, in UTC.
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, ApiError> {
    let summary = state.db.reports().dashboard_summary(Utc::now()).await?;
    Ok(Json(summary))
}
