//! Read-only downline and wallet-info endpoints.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{parse_wallet, AppState};
use crate::domain::{NodeView, WalletAffiliateInfo};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownlineQuery {
    pub wallet: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownlineResponse {
    pub downline: NodeView,
    /// Nodes below the requested wallet.
    pub total_members: i64,
    /// Active nodes below the requested wallet.
    pub active_members: i64,
}

pub async fn get_downline(
    Query(params): Query<DownlineQuery>,
    State(state): State<AppState>,
) -> Result<Json<DownlineResponse>, AppError> {
    let wallet = parse_wallet(&params.wallet)?;

    let downline = state.aggregator.build_downline(&wallet).await?;
    let total_members = downline.count_total();
    let active_members = downline.count_active();
    Ok(Json(DownlineResponse {
        downline,
        total_members,
        active_members,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfoResponse {
    pub member: bool,
    // A None flattens to nothing, so non-members get a bare {"member": false}.
    #[serde(flatten)]
    pub info: Option<WalletAffiliateInfo>,
}

/// A wallet outside the forest is a "not a member" result, not an error.
pub async fn get_wallet_info(
    Path(wallet): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<WalletInfoResponse>, AppError> {
    let wallet = parse_wallet(&wallet)?;

    let info = state.aggregator.wallet_info(&wallet).await?;
    Ok(Json(WalletInfoResponse {
        member: info.is_some(),
        info,
    }))
}
