//! Forest overview endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::AppState;
use crate::domain::ForestOverview;
use crate::error::AppError;

pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<Json<ForestOverview>, AppError> {
    let overview = state.reporter.forest_overview().await?;
    Ok(Json(overview))
}
