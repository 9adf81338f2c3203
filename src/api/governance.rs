// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Governance endpoints: proposals, votes and parameters.

use alloy::primitives::U256;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use super::extract::{checksum, parse_address, parse_call_data, parse_id, ApiJson, IntegerInput};
use super::TxHashResponse;
use crate::blockchain::{GovernanceParams, ProposalDetails};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalRequest {
    pub description: Option<String>,
    /// Contract the proposal would call.
    pub target: Option<String>,
    /// `0x`-prefixed hex call data.
    pub call_data: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalResponse {
    pub tx_hash: String,
    pub proposal_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalCountResponse {
    pub proposal_count: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetailsBody {
    pub proposer: String,
    pub description: String,
    pub created_at: String,
    pub votes_for: String,
    pub votes_against: String,
    pub executed: bool,
    pub canceled: bool,
    /// 0 Active, 1 Defeated, 2 Succeeded, 3 Executed, 4 Expired, 5 Canceled.
    pub state: u8,
}

impl From<&ProposalDetails> for ProposalDetailsBody {
    fn from(details: &ProposalDetails) -> Self {
        Self {
            proposer: checksum(&details.proposer),
            description: details.description.clone(),
            created_at: details.created_at.to_string(),
            votes_for: details.votes_for.to_string(),
            votes_against: details.votes_against.to_string(),
            executed: details.executed,
            canceled: details.canceled,
            state: details.state.as_u8(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProposalResponse {
    pub id: String,
    pub state: u8,
    pub details: ProposalDetailsBody,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VotesResponse {
    pub votes_for: String,
    pub votes_against: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteOfResponse {
    /// 0 none, 1 for, 2 against.
    pub vote: u8,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VoteRequest {
    #[schema(value_type = bool)]
    pub support: Option<Value>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParamsResponse {
    pub voting_period: String,
    pub execution_delay: String,
    pub quorum: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParamsRequest {
    pub voting_period: Option<IntegerInput>,
    pub execution_delay: Option<IntegerInput>,
    pub quorum: Option<IntegerInput>,
}

impl UpdateParamsRequest {
    fn params(&self) -> Result<GovernanceParams, ApiError> {
        let (Some(voting_period), Some(execution_delay), Some(quorum)) =
            (&self.voting_period, &self.execution_delay, &self.quorum)
        else {
            return Err(ApiError::bad_request(
                "votingPeriod, executionDelay, quorum required",
            ));
        };
        Ok(GovernanceParams {
            voting_period: voting_period.to_u256("votingPeriod")?,
            execution_delay: execution_delay.to_u256("executionDelay")?,
            quorum: quorum.to_u256("quorum")?,
        })
    }
}

/// Open a proposal from the server signer.
///
/// The returned id is `proposalCount - 1` read after inclusion, which is
/// only accurate when no other proposal lands in between.
#[utoipa::path(
    post,
    path = "/api/governance/proposals",
    tag = "Governance",
    request_body = CreateProposalRequest,
    responses(
        (status = 200, description = "Proposal created", body = CreateProposalResponse),
        (status = 400, description = "Missing or malformed fields"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn create_proposal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProposalRequest>,
) -> Result<Json<CreateProposalResponse>, ApiError> {
    let present = |field: &Option<String>| field.clone().filter(|s| !s.trim().is_empty());
    let (Some(description), Some(target), Some(call_data)) = (
        present(&request.description),
        present(&request.target),
        present(&request.call_data),
    ) else {
        return Err(ApiError::bad_request(
            "description, target, callData required",
        ));
    };
    let target = parse_address(&target)?;
    let call_data = parse_call_data(&call_data)?;

    let governance = &state.contracts.governance;
    let receipt = governance
        .create_proposal(description, target, call_data)
        .await?
        .confirm()
        .await?;
    let proposal_id = governance
        .proposal_count()
        .await?
        .saturating_sub(U256::from(1u64));
    info!(tx_hash = %receipt.hash_hex(), %proposal_id, "proposal created");

    Ok(Json(CreateProposalResponse {
        tx_hash: receipt.hash_hex(),
        proposal_id: proposal_id.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/governance/proposals/count",
    tag = "Governance",
    responses(
        (status = 200, description = "Number of proposals", body = ProposalCountResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn proposal_count(
    State(state): State<AppState>,
) -> Result<Json<ProposalCountResponse>, ApiError> {
    let count = state.contracts.governance.proposal_count().await?;
    Ok(Json(ProposalCountResponse {
        proposal_count: count.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/governance/proposals/{id}",
    tag = "Governance",
    params(("id" = String, Path, description = "Decimal proposal id")),
    responses(
        (status = 200, description = "Proposal state and details", body = ProposalResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Unknown proposal or RPC failure")
    )
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProposalResponse>, ApiError> {
    let id = parse_id(&id)?;
    let governance = &state.contracts.governance;
    let (proposal_state, details) =
        tokio::try_join!(governance.proposal_state(id), governance.proposal_details(id))?;
    Ok(Json(ProposalResponse {
        id: id.to_string(),
        state: proposal_state.as_u8(),
        details: ProposalDetailsBody::from(&details),
    }))
}

#[utoipa::path(
    get,
    path = "/api/governance/proposals/{id}/votes",
    tag = "Governance",
    params(("id" = String, Path, description = "Decimal proposal id")),
    responses(
        (status = 200, description = "Vote totals", body = VotesResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Unknown proposal or RPC failure")
    )
)]
pub async fn proposal_votes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VotesResponse>, ApiError> {
    let id = parse_id(&id)?;
    let tally = state.contracts.governance.proposal_votes(id).await?;
    Ok(Json(VotesResponse {
        votes_for: tally.votes_for.to_string(),
        votes_against: tally.votes_against.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/governance/proposals/{id}/vote/{address}",
    tag = "Governance",
    params(
        ("id" = String, Path, description = "Decimal proposal id"),
        ("address" = String, Path, description = "Voter address")
    ),
    responses(
        (status = 200, description = "Recorded vote", body = VoteOfResponse),
        (status = 400, description = "Malformed id or address"),
        (status = 500, description = "Unknown proposal or RPC failure")
    )
)]
pub async fn vote_of(
    State(state): State<AppState>,
    Path((id, address)): Path<(String, String)>,
) -> Result<Json<VoteOfResponse>, ApiError> {
    let id = parse_id(&id)?;
    let voter = parse_address(&address)?;
    let vote = state.contracts.governance.vote_of(id, voter).await?;
    Ok(Json(VoteOfResponse { vote: vote.as_u8() }))
}

#[utoipa::path(
    post,
    path = "/api/governance/proposals/{id}/vote",
    tag = "Governance",
    params(("id" = String, Path, description = "Decimal proposal id")),
    request_body = VoteRequest,
    responses(
        (status = 200, description = "Vote mined", body = TxHashResponse),
        (status = 400, description = "Malformed id or support flag"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<VoteRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let id = parse_id(&id)?;
    let Some(Value::Bool(support)) = request.support else {
        return Err(ApiError::bad_request("support (boolean) required"));
    };
    let receipt = state
        .contracts
        .governance
        .cast_vote(id, support)
        .await?
        .confirm()
        .await?;
    info!(tx_hash = %receipt.hash_hex(), proposal_id = %id, support, "vote mined");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    post,
    path = "/api/governance/proposals/{id}/execute",
    tag = "Governance",
    params(("id" = String, Path, description = "Decimal proposal id")),
    responses(
        (status = 200, description = "Execution mined", body = TxHashResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn execute_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let id = parse_id(&id)?;
    let receipt = state
        .contracts
        .governance
        .execute_proposal(id)
        .await?
        .confirm()
        .await?;
    info!(tx_hash = %receipt.hash_hex(), proposal_id = %id, "proposal executed");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    post,
    path = "/api/governance/proposals/{id}/cancel",
    tag = "Governance",
    params(("id" = String, Path, description = "Decimal proposal id")),
    responses(
        (status = 200, description = "Cancellation mined", body = TxHashResponse),
        (status = 400, description = "Malformed id"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn cancel_proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let id = parse_id(&id)?;
    let receipt = state
        .contracts
        .governance
        .cancel_proposal(id)
        .await?
        .confirm()
        .await?;
    info!(tx_hash = %receipt.hash_hex(), proposal_id = %id, "proposal canceled");
    Ok(Json(TxHashResponse::from(&receipt)))
}

#[utoipa::path(
    get,
    path = "/api/governance/params",
    tag = "Governance",
    responses(
        (status = 200, description = "Current parameters", body = ParamsResponse),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn get_params(State(state): State<AppState>) -> Result<Json<ParamsResponse>, ApiError> {
    let params = state.contracts.governance.params().await?;
    Ok(Json(ParamsResponse {
        voting_period: params.voting_period.to_string(),
        execution_delay: params.execution_delay.to_string(),
        quorum: params.quorum.to_string(),
    }))
}

/// Owner-only on chain; other signers get the contract's revert as a 500.
#[utoipa::path(
    put,
    path = "/api/governance/params",
    tag = "Governance",
    request_body = UpdateParamsRequest,
    responses(
        (status = 200, description = "Update mined", body = TxHashResponse),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Contract or RPC failure")
    )
)]
pub async fn update_params(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UpdateParamsRequest>,
) -> Result<Json<TxHashResponse>, ApiError> {
    let params = request.params()?;
    let receipt = state
        .contracts
        .governance
        .update_params(params)
        .await?
        .confirm()
        .await?;
    info!(tx_hash = %receipt.hash_hex(), "governance parameters updated");
    Ok(Json(TxHashResponse::from(&receipt)))
}
