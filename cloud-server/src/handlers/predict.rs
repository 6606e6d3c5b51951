//! Prediction handlers

use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use disaster_core::logic::features::featurize_window;
use disaster_core::logic::model::classify_value;

use crate::models::{SensorPredictRequest, SensorPredictResponse, TextPredictRequest, TextPredictResponse};
use crate::{AppError, AppResult, AppState};

/// Classify one social post
pub async fn text(
    State(state): State<AppState>,
    payload: Result<Json<TextPredictRequest>, JsonRejection>,
) -> AppResult<Json<TextPredictResponse>> {
    let Json(req) = payload?;
    if !req.has_text() {
        return Err(AppError::ValidationError("text required".to_string()));
    }

    let model = state.ctx.models.text()?;
    let started = Instant::now();
    let verdict = classify_value(&req.text, model);
    state.ctx.text_stats.record(started.elapsed());

    tracing::debug!(label = verdict.label, confidence = verdict.confidence, "text classified");
    Ok(Json(verdict.into()))
}

/// Score one sensor window
pub async fn sensor(
    State(state): State<AppState>,
    payload: Result<Json<SensorPredictRequest>, JsonRejection>,
) -> AppResult<Json<SensorPredictResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let model = state.ctx.models.sensor()?;
    let started = Instant::now();
    let verdict = model.score(&featurize_window(&req.window));
    state.ctx.sensor_stats.record(started.elapsed());

    if verdict.is_anomaly {
        tracing::info!(score = verdict.score, rows = req.window.len(), "sensor anomaly");
    }
    Ok(Json(verdict.into()))
}
