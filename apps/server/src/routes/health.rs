use axum::extract::State;
use axum::Json;

use crate::dto::Health;
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = state.db.health_check().await;
    Json(Health {
        status: if database { "ok" } else { "degraded" },
        database,
    })
}
