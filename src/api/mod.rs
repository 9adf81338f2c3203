// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use crate::{blockchain::TxReceipt, state::AppState};

pub mod dashboard;
pub mod deth;
pub mod extract;
pub mod governance;
pub mod health;
pub mod seth;

/// Hash of a mined transaction.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TxHashResponse {
    pub tx_hash: String,
}

impl From<&TxReceipt> for TxHashResponse {
    fn from(receipt: &TxReceipt) -> Self {
        Self {
            tx_hash: receipt.hash_hex(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/deth/deposit", post(deth::deposit))
        .route("/deth/withdraw", post(deth::withdraw))
        .route("/deth/balance/{address}", get(deth::balance))
        .route("/deth/contract-balance", get(deth::contract_balance))
        .route("/seth/stake", post(seth::stake))
        .route("/seth/unstake", post(seth::unstake))
        .route("/seth/stake-info/{address}", get(seth::stake_info))
        .route("/seth/totals", get(seth::totals))
        .route("/seth/stakers", get(seth::paginated_stakers))
        .route("/seth/stakers/all", get(seth::all_stakers))
        .route("/seth/stakers/top", get(seth::top_stakers))
        .route("/seth/balance/{address}", get(seth::balance))
        .route("/seth/leaderboard/update", post(seth::update_leaderboard))
        .route(
            "/governance/proposals",
            post(governance::create_proposal),
        )
        .route(
            "/governance/proposals/count",
            get(governance::proposal_count),
        )
        .route("/governance/proposals/{id}", get(governance::get_proposal))
        .route(
            "/governance/proposals/{id}/votes",
            get(governance::proposal_votes),
        )
        .route(
            "/governance/proposals/{id}/vote",
            post(governance::cast_vote),
        )
        .route(
            "/governance/proposals/{id}/vote/{address}",
            get(governance::vote_of),
        )
        .route(
            "/governance/proposals/{id}/execute",
            post(governance::execute_proposal),
        )
        .route(
            "/governance/proposals/{id}/cancel",
            post(governance::cancel_proposal),
        )
        .route(
            "/governance/params",
            get(governance::get_params).put(governance::update_params),
        )
        .route("/dashboard/overview", get(dashboard::overview))
        .route("/dashboard/leaderboard", get(dashboard::leaderboard))
        .route("/dashboard/staker/{address}", get(dashboard::staker))
        .route("/dashboard/activity", get(dashboard::activity))
        .route("/dashboard/stakers", get(dashboard::stakers))
        .route("/dashboard/tokens", get(dashboard::tokens));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        deth::deposit,
        deth::withdraw,
        deth::balance,
        deth::contract_balance,
        seth::stake,
        seth::unstake,
        seth::stake_info,
        seth::totals,
        seth::all_stakers,
        seth::top_stakers,
        seth::paginated_stakers,
        seth::balance,
        seth::update_leaderboard,
        governance::create_proposal,
        governance::proposal_count,
        governance::get_proposal,
        governance::proposal_votes,
        governance::vote_of,
        governance::cast_vote,
        governance::execute_proposal,
        governance::cancel_proposal,
        governance::get_params,
        governance::update_params,
        dashboard::overview,
        dashboard::leaderboard,
        dashboard::staker,
        dashboard::activity,
        dashboard::stakers,
        dashboard::tokens
    ),
    components(
        schemas(
            TxHashResponse,
            extract::IntegerInput,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            deth::AmountEthRequest,
            deth::BalanceResponse,
            deth::ContractBalanceResponse,
            seth::AmountWeiRequest,
            seth::StakeInfoResponse,
            seth::TotalsResponse,
            seth::AllStakersResponse,
            seth::TopStakersResponse,
            seth::StakerPageResponse,
            seth::BalanceResponse,
            governance::CreateProposalRequest,
            governance::CreateProposalResponse,
            governance::ProposalCountResponse,
            governance::ProposalResponse,
            governance::ProposalDetailsBody,
            governance::VotesResponse,
            governance::VoteOfResponse,
            governance::VoteRequest,
            governance::ParamsResponse,
            governance::UpdateParamsRequest,
            dashboard::OverviewResponse,
            dashboard::LeaderboardResponse,
            dashboard::StakerDetailsResponse,
            dashboard::ActivityResponse,
            dashboard::DetailedStakerPageResponse,
            dashboard::TokensResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "dETH", description = "ETH deposits and withdrawals"),
        (name = "sETH", description = "Staking and staker queries"),
        (name = "Governance", description = "Proposals, votes and parameters"),
        (name = "Dashboard", description = "Aggregated staking statistics")
    )
)]
struct ApiDoc;
