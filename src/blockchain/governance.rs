// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Governance module: proposals, sETH-weighted votes, execution.

use alloy::{
    primitives::{Address, Bytes, U256},
    providers::DynProvider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainError;
use super::contracts::contract_error;
use super::transactions::{PendingTx, Submitter};
use super::types::{GovernanceParams, ProposalDetails, ProposalState, VoteChoice, VoteTally};

sol! {
    #[sol(rpc)]
    interface IGovernance {
        struct ProposalView {
            address proposer;
            string description;
            uint256 createdAt;
            uint256 votesFor;
            uint256 votesAgainst;
            bool executed;
            bool canceled;
            uint8 state;
        }

        function proposalCount() external view returns (uint256);
        function votingPeriod() external view returns (uint256);
        function executionDelay() external view returns (uint256);
        function quorum() external view returns (uint256);
        function createProposal(string description, address target, bytes callData) external returns (uint256);
        function castVote(uint256 proposalId, bool support) external;
        function executeProposal(uint256 proposalId) external;
        function cancelProposal(uint256 proposalId) external;
        function getProposalState(uint256 proposalId) external view returns (uint8);
        function getProposalDetails(uint256 proposalId) external view returns (ProposalView memory);
        function getProposalVotes(uint256 proposalId) external view returns (uint256 votesFor, uint256 votesAgainst);
        function getVoteByUser(uint256 proposalId, address voter) external view returns (uint8);
        function updateGovernanceParams(uint256 votingPeriod, uint256 executionDelay, uint256 quorum) external;
    }
}

/// Governance contract interface.
///
/// The contract owns every state transition; this interface only submits
/// requests and reads back the resulting state.
#[async_trait]
pub trait GovernanceModule: Send + Sync {
    fn address(&self) -> Address;

    async fn proposal_count(&self) -> Result<U256, ChainError>;

    async fn params(&self) -> Result<GovernanceParams, ChainError>;

    async fn create_proposal(
        &self,
        description: String,
        target: Address,
        call_data: Bytes,
    ) -> Result<PendingTx, ChainError>;

    async fn cast_vote(&self, proposal_id: U256, support: bool) -> Result<PendingTx, ChainError>;

    async fn execute_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError>;

    async fn cancel_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError>;

    async fn proposal_state(&self, proposal_id: U256) -> Result<ProposalState, ChainError>;

    async fn proposal_details(&self, proposal_id: U256) -> Result<ProposalDetails, ChainError>;

    async fn proposal_votes(&self, proposal_id: U256) -> Result<VoteTally, ChainError>;

    async fn vote_of(&self, proposal_id: U256, voter: Address) -> Result<VoteChoice, ChainError>;

    async fn update_params(&self, params: GovernanceParams) -> Result<PendingTx, ChainError>;
}

/// On-chain governance handle.
pub struct RpcGovernanceModule {
    contract: IGovernance::IGovernanceInstance<DynProvider>,
    submitter: Submitter,
}

impl RpcGovernanceModule {
    pub(crate) fn new(address: Address, provider: DynProvider, submitter: Submitter) -> Self {
        Self {
            contract: IGovernance::new(address, provider),
            submitter,
        }
    }
}

#[async_trait]
impl GovernanceModule for RpcGovernanceModule {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn proposal_count(&self) -> Result<U256, ChainError> {
        self.contract
            .proposalCount()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn params(&self) -> Result<GovernanceParams, ChainError> {
        let voting_period = self.contract.votingPeriod();
        let execution_delay = self.contract.executionDelay();
        let quorum = self.contract.quorum();
        let (voting_period, execution_delay, quorum) = tokio::try_join!(
            async { voting_period.call().await },
            async { execution_delay.call().await },
            async { quorum.call().await },
        )
        .map_err(contract_error)?;
        Ok(GovernanceParams {
            voting_period,
            execution_delay,
            quorum,
        })
    }

    async fn create_proposal(
        &self,
        description: String,
        target: Address,
        call_data: Bytes,
    ) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .createProposal(description, target, call_data)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn cast_vote(&self, proposal_id: U256, support: bool) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .castVote(proposal_id, support)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn execute_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .executeProposal(proposal_id)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn cancel_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .cancelProposal(proposal_id)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn proposal_state(&self, proposal_id: U256) -> Result<ProposalState, ChainError> {
        let raw = self
            .contract
            .getProposalState(proposal_id)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(ProposalState::from(raw))
    }

    async fn proposal_details(&self, proposal_id: U256) -> Result<ProposalDetails, ChainError> {
        let view = self
            .contract
            .getProposalDetails(proposal_id)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(ProposalDetails {
            proposer: view.proposer,
            description: view.description,
            created_at: view.createdAt,
            votes_for: view.votesFor,
            votes_against: view.votesAgainst,
            executed: view.executed,
            canceled: view.canceled,
            state: ProposalState::from(view.state),
        })
    }

    async fn proposal_votes(&self, proposal_id: U256) -> Result<VoteTally, ChainError> {
        let votes = self
            .contract
            .getProposalVotes(proposal_id)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(VoteTally {
            votes_for: votes.votesFor,
            votes_against: votes.votesAgainst,
        })
    }

    async fn vote_of(&self, proposal_id: U256, voter: Address) -> Result<VoteChoice, ChainError> {
        let raw = self
            .contract
            .getVoteByUser(proposal_id, voter)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(VoteChoice::from(raw))
    }

    async fn update_params(&self, params: GovernanceParams) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .updateGovernanceParams(params.voting_period, params.execution_delay, params.quorum)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }
}
