//! Mutating admin endpoints for the affiliate forest.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::{now_ms, parse_wallet, AppState};
use crate::domain::{Decimal, NodeId, NodeStatus, Percent, TreeId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreeRequest {
    pub root_wallet: String,
    pub ceiling_percent: Decimal,
    pub alias: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTreeResponse {
    pub tree_id: TreeId,
}

pub async fn create_tree(
    State(state): State<AppState>,
    Json(req): Json<CreateTreeRequest>,
) -> Result<Json<CreateTreeResponse>, AppError> {
    let root_wallet = parse_wallet(&req.root_wallet)?;
    let alias = req.alias.trim();
    if alias.is_empty() {
        return Err(AppError::BadRequest("alias is required".to_string()));
    }

    let tree_id = state
        .mutator
        .create_tree(&root_wallet, req.ceiling_percent, alias, now_ms())
        .await?;
    Ok(Json(CreateTreeResponse { tree_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMemberRequest {
    pub referrer_wallet: String,
    pub new_wallet: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachMemberResponse {
    pub node_id: NodeId,
}

pub async fn attach_member(
    State(state): State<AppState>,
    Json(req): Json<AttachMemberRequest>,
) -> Result<Json<AttachMemberResponse>, AppError> {
    let referrer = parse_wallet(&req.referrer_wallet)?;
    let new_wallet = parse_wallet(&req.new_wallet)?;

    let node_id = state
        .mutator
        .attach_member(&referrer, &new_wallet, now_ms())
        .await?;
    Ok(Json(AttachMemberResponse { node_id }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRootCommissionRequest {
    pub root_wallet: String,
    pub new_percent: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRootCommissionResponse {
    pub old_percent: Percent,
    pub new_percent: Percent,
    pub descendant_floor: Percent,
}

pub async fn update_root_commission(
    State(state): State<AppState>,
    Json(req): Json<UpdateRootCommissionRequest>,
) -> Result<Json<UpdateRootCommissionResponse>, AppError> {
    let root_wallet = parse_wallet(&req.root_wallet)?;

    let change = state
        .mutator
        .update_root_commission(&root_wallet, req.new_percent, now_ms())
        .await?;
    Ok(Json(UpdateRootCommissionResponse {
        old_percent: change.old_percent,
        new_percent: change.new_percent,
        descendant_floor: change.descendant_floor,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFlowRequest {
    pub wallet: String,
    pub new_parent_wallet: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFlowResponse {
    pub descendants_moved: u64,
}

pub async fn change_flow(
    State(state): State<AppState>,
    Json(req): Json<ChangeFlowRequest>,
) -> Result<Json<ChangeFlowResponse>, AppError> {
    let wallet = parse_wallet(&req.wallet)?;
    let new_parent = parse_wallet(&req.new_parent_wallet)?;

    let descendants_moved = state
        .mutator
        .change_flow(&wallet, &new_parent, now_ms())
        .await?;
    Ok(Json(ChangeFlowResponse { descendants_moved }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusRequest {
    pub wallet: String,
    pub active: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusResponse {
    pub old_status: NodeStatus,
    pub new_status: NodeStatus,
    /// True when a root was deactivated; its descendants stay active.
    pub root_warning: bool,
}

pub async fn set_status(
    State(state): State<AppState>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>, AppError> {
    let wallet = parse_wallet(&req.wallet)?;

    let change = state
        .mutator
        .set_status(&wallet, req.active, now_ms())
        .await?;
    Ok(Json(SetStatusResponse {
        old_status: change.old_status,
        new_status: change.new_status,
        root_warning: change.root_warning,
    }))
}
