// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only staking dashboard endpoints.

use alloy::primitives::U256;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::extract::{checksum, checksums, decimals, parse_address, ApiQuery};
use super::seth::{CountQuery, PageQuery, DEFAULT_TOP_COUNT};
use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_ACTIVITY_DAYS: u64 = 7;

#[derive(Debug, Serialize, ToSchema)]
pub struct OverviewResponse {
    #[serde(rename = "totalETHDepositedWei")]
    pub total_eth_deposited_wei: String,
    #[serde(rename = "totalETHStakedWei")]
    pub total_eth_staked_wei: String,
    #[serde(rename = "totalStakers")]
    pub total_stakers: String,
    #[serde(rename = "averageStakeWei")]
    pub average_stake_wei: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub count: u64,
    pub addresses: Vec<String>,
    pub amounts_wei: Vec<String>,
    /// Share of total stake in basis points (2550 = 25.50%).
    pub percentages_bps: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StakerDetailsResponse {
    pub address: String,
    pub amount_wei: String,
    pub timestamp: String,
    pub rank: String,
    pub percentage_bps: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// Look-back window in days, default 7.
    pub days_ago: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityResponse {
    pub days_ago: u64,
    pub active_stakers: String,
    pub recent_stakers: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailedStakerPageResponse {
    pub offset: u64,
    pub limit: u64,
    pub addresses: Vec<String>,
    pub amounts_wei: Vec<String>,
    pub timestamps: Vec<String>,
    pub ranks: Vec<String>,
    pub percentages_bps: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokensResponse {
    #[serde(rename = "sETHToken")]
    pub seth_token: String,
    #[serde(rename = "dETHToken")]
    pub deth_token: String,
}

#[utoipa::path(
    get,
    path = "/api/dashboard/overview",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Protocol-wide totals", body = OverviewResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn overview(State(state): State<AppState>) -> Result<Json<OverviewResponse>, ApiError> {
    let overview = state.contracts.dashboard.staking_overview().await?;
    Ok(Json(OverviewResponse {
        total_eth_deposited_wei: overview.total_eth_deposited.to_string(),
        total_eth_staked_wei: overview.total_eth_staked.to_string(),
        total_stakers: overview.total_stakers.to_string(),
        average_stake_wei: overview.average_stake.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/leaderboard",
    tag = "Dashboard",
    params(CountQuery),
    responses(
        (status = 200, description = "Top stakers with their share", body = LeaderboardResponse),
        (status = 400, description = "Malformed count"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let count = query.count.unwrap_or(DEFAULT_TOP_COUNT);
    let board = state.contracts.dashboard.leaderboard(U256::from(count)).await?;
    Ok(Json(LeaderboardResponse {
        count,
        addresses: checksums(&board.addresses),
        amounts_wei: decimals(&board.amounts),
        percentages_bps: decimals(&board.percentages_bps),
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/staker/{address}",
    tag = "Dashboard",
    params(("address" = String, Path, description = "Staker address")),
    responses(
        (status = 200, description = "Position of one staker", body = StakerDetailsResponse),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn staker(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<StakerDetailsResponse>, ApiError> {
    let address = parse_address(&address)?;
    let details = state.contracts.dashboard.staker_details(address).await?;
    Ok(Json(StakerDetailsResponse {
        address: checksum(&address),
        amount_wei: details.amount.to_string(),
        timestamp: details.timestamp.to_string(),
        rank: details.rank.to_string(),
        percentage_bps: details.percentage_bps.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/activity",
    tag = "Dashboard",
    params(ActivityQuery),
    responses(
        (status = 200, description = "Recent staking activity", body = ActivityResponse),
        (status = 400, description = "Malformed daysAgo"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn activity(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ActivityQuery>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let days_ago = query.days_ago.unwrap_or(DEFAULT_ACTIVITY_DAYS);
    let activity = state
        .contracts
        .dashboard
        .staking_activity(U256::from(days_ago))
        .await?;
    Ok(Json(ActivityResponse {
        days_ago,
        active_stakers: activity.active_stakers.to_string(),
        recent_stakers: checksums(&activity.recent_stakers),
    }))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/stakers",
    tag = "Dashboard",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of stakers with shares", body = DetailedStakerPageResponse),
        (status = 400, description = "Malformed offset or limit"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn stakers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<DetailedStakerPageResponse>, ApiError> {
    let (offset, limit) = query.resolve();
    let page = state
        .contracts
        .dashboard
        .paginated_stakers(U256::from(offset), U256::from(limit))
        .await?;
    Ok(Json(DetailedStakerPageResponse {
        offset,
        limit,
        addresses: checksums(&page.addresses),
        amounts_wei: decimals(&page.amounts),
        timestamps: decimals(&page.timestamps),
        ranks: decimals(&page.ranks),
        percentages_bps: decimals(&page.percentages_bps),
    }))
}

/// Token addresses the dashboard reads from.
#[utoipa::path(
    get,
    path = "/api/dashboard/tokens",
    tag = "Dashboard",
    responses(
        (status = 200, description = "sETH and dETH addresses", body = TokensResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn tokens(State(state): State<AppState>) -> Result<Json<TokensResponse>, ApiError> {
    let dashboard = &state.contracts.dashboard;
    let (seth, deth) = tokio::try_join!(dashboard.seth_token(), dashboard.deth_token())?;
    Ok(Json(TokensResponse {
        seth_token: checksum(&seth),
        deth_token: checksum(&deth),
    }))
}
