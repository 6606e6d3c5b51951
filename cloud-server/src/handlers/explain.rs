//! Text model explanation handler

use axum::{extract::{rejection::QueryRejection, Query, State}, Json};

use disaster_core::logic::model::Explanation;

use crate::models::ExplainQuery;
use crate::{AppError, AppResult, AppState};

const DEFAULT_TOP_N: usize = 10;
const MAX_TOP_N: usize = 500;

/// Most indicative terms per class
pub async fn text(
    State(state): State<AppState>,
    query: Result<Query<ExplainQuery>, QueryRejection>,
) -> AppResult<Json<Explanation>> {
    let Query(query) = query?;
    let n = query.n.unwrap_or(DEFAULT_TOP_N);
    if n == 0 || n > MAX_TOP_N {
        return Err(AppError::ValidationError(format!("n must be between 1 and {}", MAX_TOP_N)));
    }

    let model = state.ctx.models.text()?;
    Ok(Json(model.top_features(n)))
}
