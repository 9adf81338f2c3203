// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! sETH endpoints: staking, unstaking and staker queries.
//!
//! Staking pulls dETH from the server signer, which must already have
//! approved the sETH contract as spender.

use alloy::primitives::U256;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use super::extract::{checksum, checksums, decimals, parse_address, ApiJson, ApiQuery, IntegerInput};
use super::TxHashResponse;
use crate::error::ApiError;
use crate::state::AppState;

pub const DEFAULT_TOP_COUNT: u64 = 10;
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Amount in wei of dETH (stake) or sETH (unstake).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmountWeiRequest {
    pub amount_wei: Option<IntegerInput>,
}

impl AmountWeiRequest {
    fn wei(&self) -> Result<U256, ApiError> {
        self.amount_wei
            .as_ref()
            .ok_or_else(|| ApiError::bad_request("amountWei required"))?
            .to_u256("amountWei")
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CountQuery {
    /// Number of entries, default 10.
    pub count: Option<u64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Default 0.
    pub offset: Option<u64>,
    /// Default 20.
    pub limit: Option<u64>,
}

impl PageQuery {
    pub fn resolve(&self) -> (u64, u64) {
        (
            self.offset.unwrap_or(0),
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StakeInfoResponse {
    pub user: String,
    pub amount_wei: String,
    pub timestamp: String,
    pub rank: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalsResponse {
    pub total_staked_wei: String,
    pub total_stakers: String,
    #[serde(rename = "dETHToken")]
    pub deth_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllStakersResponse {
    pub stakers: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopStakersResponse {
    pub count: u64,
    pub addresses: Vec<String>,
    pub amounts_wei: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StakerPageResponse {
    pub offset: u64,
    pub limit: u64,
    pub addresses: Vec<String>,
    pub amounts_wei: Vec<String>,
    pub timestamps: Vec<String>,
    pub ranks: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    pub balance_wei: String,
}

#[utoipa::path(
    post,
    path = "/api/seth/stake",
    tag = "sETH",
    request_body = AmountWeiRequest,
    responses(
        (status = 200, description = "Stake mined", body = TxHashResponse),
        (status = 400, description = "Missing or malformed amount"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn stake(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AmountWeiRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let amount = request.wei()?;
    let receipt = state.contracts.seth.stake(amount).await?.confirm().await?;
    info!(tx_hash = %receipt.hash_hex(), %amount, "stake mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    post,
    path = "/api/seth/unstake",
    tag = "sETH",
    request_body = AmountWeiRequest,
    responses(
        (status = 200, description = "Unstake mined", body = TxHashResponse),
        (status = 400, description = "Missing or malformed amount"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn unstake(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AmountWeiRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let amount = request.wei()?;
    let receipt = state.contracts.seth.unstake(amount).await?.confirm().await?;
    info!(tx_hash = %receipt.hash_hex(), %amount, "unstake mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    get,
    path = "/api/seth/stake-info/{address}",
    tag = "sETH",
    params(("address" = String, Path, description = "Staker address")),
    responses(
        (status = 200, description = "Stake amount, start time and rank", body = StakeInfoResponse),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn stake_info(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<StakeInfoResponse>, ApiError> {
    let user = parse_address(&address)?;
    let info = state.contracts.seth.stake_info(user).await?;
    Ok(Json(StakeInfoResponse {
        user: checksum(&user),
        amount_wei: info.amount.to_string(),
        timestamp: info.timestamp.to_string(),
        rank: info.rank.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/seth/totals",
    tag = "sETH",
    responses(
        (status = 200, description = "Aggregate staking totals", body = TotalsResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn totals(State(state): State<AppState>) -> Result<Json<TotalsResponse>, ApiError> {
    let seth = &state.contracts.seth;
    let (staked, stakers, token) =
        tokio::try_join!(seth.total_staked(), seth.total_stakers(), seth.deth_token())?;
    Ok(Json(TotalsResponse {
        total_staked_wei: staked.to_string(),
        total_stakers: stakers.to_string(),
        deth_token: checksum(&token),
    }))
}

/// Every staker address. Unbounded; prefer the paginated route.
#[utoipa::path(
    get,
    path = "/api/seth/stakers/all",
    tag = "sETH",
    responses(
        (status = 200, description = "All staker addresses", body = AllStakersResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn all_stakers(
    State(state): State<AppState>,
) -> Result<Json<AllStakersResponse>, ApiError> {
    let stakers = state.contracts.seth.all_stakers().await?;
    Ok(Json(AllStakersResponse {
        stakers: checksums(&stakers),
    }))
}

#[utoipa::path(
    get,
    path = "/api/seth/stakers/top",
    tag = "sETH",
    params(CountQuery),
    responses(
        (status = 200, description = "Largest stakers", body = TopStakersResponse),
        (status = 400, description = "Malformed count"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn top_stakers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CountQuery>,
) -> Result<Json<TopStakersResponse>, ApiError> {
    let count = query.count.unwrap_or(DEFAULT_TOP_COUNT);
    let top = state.contracts.seth.top_stakers(U256::from(count)).await?;
    Ok(Json(TopStakersResponse {
        count,
        addresses: checksums(&top.addresses),
        amounts_wei: decimals(&top.amounts),
    }))
}

#[utoipa::path(
    get,
    path = "/api/seth/stakers",
    tag = "sETH",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of stakers", body = StakerPageResponse),
        (status = 400, description = "Malformed offset or limit"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn paginated_stakers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<StakerPageResponse>, ApiError> {
    let (offset, limit) = query.resolve();
    let page = state
        .contracts
        .seth
        .paginated_stakers(U256::from(offset), U256::from(limit))
        .await?;
    Ok(Json(StakerPageResponse {
        offset,
        limit,
        addresses: checksums(&page.addresses),
        amounts_wei: decimals(&page.amounts),
        timestamps: decimals(&page.timestamps),
        ranks: decimals(&page.ranks),
    }))
}

#[utoipa::path(
    get,
    path = "/api/seth/balance/{address}",
    tag = "sETH",
    params(("address" = String, Path, description = "Account address")),
    responses(
        (status = 200, description = "sETH balance", body = BalanceResponse),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = parse_address(&address)?;
    let balance = state.contracts.seth.balance_of(address).await?;
    Ok(Json(BalanceResponse {
        address: checksum(&address),
        balance_wei: balance.to_string(),
    }))
}

/// Recompute the on-chain ranking.
#[utoipa::path(
    post,
    path = "/api/seth/leaderboard/update",
    tag = "sETH",
    responses(
        (status = 200, description = "Leaderboard update mined", body = TxHashResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn update_leaderboard(
    State(state): State<AppState>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let receipt = state
        .contracts
        .seth
        .update_leaderboard()
        .await?
        .confirm()
        .await?;
    info!(tx_hash = %receipt.hash_hex(), "leaderboard update mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{app_state, eth, Ledger, ALICE, BOB, CAROL, DETH, SETH};
    use axum::http::StatusCode;

    fn amount(input: Option<IntegerInput>) -> ApiJson<AmountWeiRequest> {
        ApiJson(AmountWeiRequest { amount_wei: input })
    }

    #[tokio::test]
    async fn stake_accepts_string_or_number_amounts() {
        let ledger = Ledger::new();
        ledger.set_deth(ALICE, eth(3));
        ledger.set_allowance(ALICE, SETH, U256::MAX);
        let state = app_state(&ledger);

        stake(
            State(state.clone()),
            amount(Some(IntegerInput::Text("2000000000000000000".to_string()))),
        )
        .await
        .unwrap();
        stake(State(state.clone()), amount(Some(IntegerInput::Number(5))))
            .await
            .unwrap();
        assert_eq!(ledger.seth_of(ALICE), eth(2) + U256::from(5u64));

        let Json(info) = stake_info(State(state), Path(ALICE.to_string()))
            .await
            .unwrap();
        assert_eq!(info.rank, "1");
        assert_eq!(info.amount_wei, (eth(2) + U256::from(5u64)).to_string());
    }

    #[tokio::test]
    async fn stake_without_allowance_fails_on_chain() {
        let ledger = Ledger::new();
        ledger.set_deth(ALICE, eth(1));
        let err = stake(
            State(app_state(&ledger)),
            amount(Some(IntegerInput::Number(1))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message.contains("insufficient allowance"));
    }

    #[tokio::test]
    async fn missing_amount_is_rejected() {
        let ledger = Ledger::new();
        let err = unstake(State(app_state(&ledger)), amount(None))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "amountWei required");

        let err = unstake(
            State(app_state(&ledger)),
            amount(Some(IntegerInput::Text("1e18".to_string()))),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(ledger.submitted().is_empty());
    }

    #[tokio::test]
    async fn staker_queries_use_defaults_and_checksums() {
        let ledger = Ledger::new();
        ledger.set_stake(ALICE, eth(1));
        ledger.set_stake(BOB, eth(3));
        ledger.set_stake(CAROL, eth(2));
        let state = app_state(&ledger);

        let Json(top) = top_stakers(State(state.clone()), ApiQuery(CountQuery { count: None }))
            .await
            .unwrap();
        assert_eq!(top.count, DEFAULT_TOP_COUNT);
        assert_eq!(
            top.addresses,
            vec![BOB.to_checksum(None), CAROL.to_checksum(None), ALICE.to_checksum(None)]
        );

        let Json(page) = paginated_stakers(
            State(state.clone()),
            ApiQuery(PageQuery {
                offset: Some(1),
                limit: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!((page.offset, page.limit), (1, DEFAULT_PAGE_LIMIT));
        assert_eq!(page.addresses.len(), 2);
        assert_eq!(page.ranks, vec!["1", "2"]);

        let Json(totals) = totals(State(state.clone())).await.unwrap();
        assert_eq!(totals.total_stakers, "3");
        assert_eq!(totals.total_staked_wei, eth(6).to_string());
        assert_eq!(totals.deth_token, DETH.to_checksum(None));

        let Json(all) = all_stakers(State(state)).await.unwrap();
        assert_eq!(all.stakers.len(), 3);
    }

    #[tokio::test]
    async fn leaderboard_update_returns_hash() {
        let ledger = Ledger::new();
        let Json(response) = update_leaderboard(State(app_state(&ledger))).await.unwrap();
        assert_eq!(response.tx_hash.len(), 66);
        assert_eq!(ledger.submitted(), vec!["updateLeaderboard"]);
    }
}
