use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::warn;

use crate::AppState;

/// Health check endpoint handler. Unauthenticated.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let database = state.db.health_check().await;
    let migrations = match state.db.migration_status().await {
        Ok((total, applied)) => json!({ "total": total, "applied": applied }),
        Err(e) => {
            warn!(error = %e, "Could not read migration status");
            Value::Null
        }
    };

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if database { "ok" } else { "degraded" },
            "service": "busdesk-api",
            "database": database,
            "migrations": migrations,
        })),
    )
}
