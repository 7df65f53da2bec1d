//! Reward ledger append endpoint, called by the trade-settlement path.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{now_ms, parse_wallet, AppState};
use crate::domain::Decimal;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRewardRequest {
    pub wallet: String,
    pub amount: Decimal,
    pub source_event_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRewardResponse {
    /// False when the source event was already recorded.
    pub recorded: bool,
}

pub async fn record_reward(
    State(state): State<AppState>,
    Json(req): Json<RecordRewardRequest>,
) -> Result<Json<RecordRewardResponse>, AppError> {
    let wallet = parse_wallet(&req.wallet)?;
    let source_event_id = req.source_event_id.trim();
    if source_event_id.is_empty() {
        return Err(AppError::BadRequest(
            "sourceEventId is required".to_string(),
        ));
    }
    if req.amount.is_negative() {
        return Err(AppError::BadRequest(
            "amount must not be negative".to_string(),
        ));
    }

    let recorded = state
        .mutator
        .record_reward(&wallet, req.amount, source_event_id, now_ms())
        .await?;
    Ok(Json(RecordRewardResponse { recorded }))
}
