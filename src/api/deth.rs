// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! dETH endpoints: deposit, withdraw and balance reads.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use super::extract::{checksum, parse_address, ApiJson};
use super::TxHashResponse;
use crate::blockchain::parse_amount;
use crate::error::ApiError;
use crate::state::AppState;

/// Amount of ether, as a decimal string such as `"1.5"`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmountEthRequest {
    pub amount_eth: Option<String>,
}

impl AmountEthRequest {
    fn wei(&self) -> Result<alloy::primitives::U256, ApiError> {
        let raw = self
            .amount_eth
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ApiError::bad_request("amountEth required"))?;
        Ok(parse_amount(raw, 18)?)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    pub balance_wei: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractBalanceResponse {
    pub contract_balance_wei: String,
}

/// Deposit ETH from the server signer and mint dETH.
#[utoipa::path(
    post,
    path = "/api/deth/deposit",
    tag = "dETH",
    request_body = AmountEthRequest,
    responses(
        (status = 200, description = "Deposit mined", body = TxHashResponse),
        (status = 400, description = "Missing or malformed amount"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn deposit(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AmountEthRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let value = request.wei()?;
    let receipt = state.contracts.deth.deposit(value).await?.confirm().await?;
    info!(tx_hash = %receipt.hash_hex(), %value, "dETH deposit mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

/// Burn dETH held by the server signer and return the ETH.
#[utoipa::path(
    post,
    path = "/api/deth/withdraw",
    tag = "dETH",
    request_body = AmountEthRequest,
    responses(
        (status = 200, description = "Withdrawal mined", body = TxHashResponse),
        (status = 400, description = "Missing or malformed amount"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn withdraw(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AmountEthRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let amount = request.wei()?;
    let receipt = state.contracts.deth.withdraw(amount).await?.confirm().await?;
    info!(tx_hash = %receipt.hash_hex(), %amount, "dETH withdrawal mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    get,
    path = "/api/deth/balance/{address}",
    tag = "dETH",
    params(("address" = String, Path, description = "Account address")),
    responses(
        (status = 200, description = "dETH balance", body = BalanceResponse),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let address = parse_address(&address)?;
    let balance = state.contracts.deth.balance_of(address).await?;
    Ok(Json(BalanceResponse {
        address: checksum(&address),
        balance_wei: balance.to_string(),
    }))
}

/// ETH held by the dETH contract as backing.
#[utoipa::path(
    get,
    path = "/api/deth/contract-balance",
    tag = "dETH",
    responses(
        (status = 200, description = "Contract ETH reserve", body = ContractBalanceResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn contract_balance(
    State(state): State<AppState>,
) -> Result<Json<ContractBalanceResponse>, ApiError> {
    let balance = state.contracts.deth.contract_eth_balance().await?;
    Ok(Json(ContractBalanceResponse {
        contract_balance_wei: balance.to_string(),
    }))
}
