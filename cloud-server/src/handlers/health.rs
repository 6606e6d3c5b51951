//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use disaster_core::logic::model::StatsSnapshot;

use crate::AppState;

#[derive(Serialize)]
pub struct ModelStatus {
    loaded: bool,
    #[serde(flatten)]
    stats: StatsSnapshot,
}

#[derive(Serialize)]
pub struct ModelsStatus {
    sensor: ModelStatus,
    text: ModelStatus,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    models: ModelsStatus,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let ctx = &state.ctx;
    let models = ModelsStatus {
        sensor: ModelStatus {
            loaded: ctx.models.has_sensor(),
            stats: ctx.sensor_stats.snapshot(),
        },
        text: ModelStatus {
            loaded: ctx.models.has_text(),
            stats: ctx.text_stats.snapshot(),
        },
    };

    let status = if ctx.models.has_sensor() && ctx.models.has_text() {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        models,
    })
}
