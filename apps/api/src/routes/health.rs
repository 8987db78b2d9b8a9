//! GET /health

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stockroom_db::migrations::migration_status;

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
    pub migrations: MigrationInfo,
}

/// Embedded schema migrations versus the ones recorded as applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub total: usize,
    pub applied: usize,
}

/// 200 when the database answers and the schema is current, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let migrations = match migration_status(state.db.pool()).await {
        Ok((total, applied)) => MigrationInfo { total, applied },
        Err(e) => {
            tracing::warn!(error = %e, "Could not read migration status");
            MigrationInfo::default()
        }
    };

    if database && migrations.applied >= migrations.total {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                database,
                migrations,
            }),
        )
    } else {
        tracing::error!(
            database,
            applied = migrations.applied,
            total = migrations.total,
            "Health check failed"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable".to_string(),
                database,
                migrations,
            }),
        )
    }
}
