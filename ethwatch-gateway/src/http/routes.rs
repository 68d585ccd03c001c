use super::AppState;
use crate::error::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use ethwatch_connector::types::MatchedTransaction;
use serde::{Deserialize, Serialize};

pub const SUBSCRIBED: &str = "Address subscribed successfully";
pub const ALREADY_SUBSCRIBED: &str = "Address already subscribed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsParams {
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub address: String,
    pub transactions: Vec<MatchedTransaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentBlockResponse {
    pub current_block: u64,
}

/// `POST /subscribe`
pub(super) async fn subscribe(
    State(state): State<AppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) = payload?;
    if request.address.trim().is_empty() {
        return Err(ApiError::MissingAddress);
    }

    let success = state.query.subscribe(&request.address).await;
    tracing::info!(address = %request.address, success, "Subscribe request handled");

    let message = if success { SUBSCRIBED } else { ALREADY_SUBSCRIBED };
    Ok(Json(SubscribeResponse {
        success,
        message: Some(message.to_string()),
    }))
}

/// `GET /transactions?address=X`
pub(super) async fn transactions(
    State(state): State<AppState>,
    params: Result<Query<TransactionsParams>, QueryRejection>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let Query(params) = params?;
    let address = params
        .address
        .filter(|address| !address.trim().is_empty())
        .ok_or(ApiError::MissingAddress)?;

    let transactions = state.query.get_transactions(&address).await;
    tracing::debug!(address = %address, count = transactions.len(), "Listing transactions");

    Ok(Json(TransactionsResponse {
        address,
        transactions,
    }))
}

/// `GET /current-block`
pub(super) async fn current_block(State(state): State<AppState>) -> Json<CurrentBlockResponse> {
    Json(CurrentBlockResponse {
        current_block: state.query.get_current_block().await,
    })
}

pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
