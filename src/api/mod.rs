pub mod downline;
pub mod health;
pub mod overview;
pub mod rewards;
pub mod trees;

use crate::domain::{TimeMs, WalletId};
use crate::engine::{DownlineAggregator, ForestReporter, TreeMutator};
use crate::error::AppError;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub mutator: Arc<TreeMutator>,
    pub aggregator: Arc<DownlineAggregator>,
    pub reporter: Arc<ForestReporter>,
}

impl AppState {
    pub fn new(
        mutator: Arc<TreeMutator>,
        aggregator: Arc<DownlineAggregator>,
        reporter: Arc<ForestReporter>,
    ) -> Self {
        Self {
            mutator,
            aggregator,
            reporter,
        }
    }
}

/// Wall-clock capture for mutation timestamps; the engine itself only ever
/// sees explicit TimeMs values.
pub(crate) fn now_ms() -> TimeMs {
    TimeMs::new(chrono::Utc::now().timestamp_millis())
}

pub(crate) fn parse_wallet(raw: &str) -> Result<WalletId, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("wallet is required".to_string()));
    }
    Ok(WalletId::new(trimmed))
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/trees", post(trees::create_tree))
        .route("/v1/trees/members", post(trees::attach_member))
        .route(
            "/v1/trees/root-commission",
            put(trees::update_root_commission),
        )
        .route("/v1/trees/flow", put(trees::change_flow))
        .route("/v1/nodes/status", put(trees::set_status))
        .route("/v1/rewards", post(rewards::record_reward))
        .route("/v1/downline", get(downline::get_downline))
        .route("/v1/wallets/:wallet", get(downline::get_wallet_info))
        .route("/v1/overview", get(overview::get_overview))
        .layer(cors)
        .with_state(state)
}
