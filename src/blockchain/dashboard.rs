// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only staking dashboard aggregator.

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainError;
use super::contracts::contract_error;
use super::types::{
    DetailedStakerPage, Leaderboard, StakerDetails, StakingActivity, StakingOverview,
};

sol! {
    #[sol(rpc)]
    interface IStakingDashboard {
        function sETHToken() external view returns (address);
        function dETHToken() external view returns (address);
        function getStakingOverview() external view returns (uint256 totalETHDeposited, uint256 totalETHStaked, uint256 totalStakers, uint256 averageStakeAmount);
        function getLeaderboard(uint256 count) external view returns (address[] memory stakerAddresses, uint256[] memory stakedAmounts, uint256[] memory percentageOfTotal);
        function getStakerDetails(address staker) external view returns (uint256 stakedAmount, uint256 stakingTimestamp, uint256 rank, uint256 percentageOfTotal);
        function getStakingActivity(uint256 daysAgo) external view returns (uint256 activeStakers, address[] memory recentStakers);
        function getPaginatedStakersDetailed(uint256 offset, uint256 limit) external view returns (address[] memory stakers, uint256[] memory amounts, uint256[] memory timestamps, uint256[] memory ranks, uint256[] memory percentages);
    }
}

/// Staking dashboard interface. Every method is a view call.
#[async_trait]
pub trait StakingDashboard: Send + Sync {
    fn address(&self) -> Address;

    async fn seth_token(&self) -> Result<Address, ChainError>;

    async fn deth_token(&self) -> Result<Address, ChainError>;

    async fn staking_overview(&self) -> Result<StakingOverview, ChainError>;

    async fn leaderboard(&self, count: U256) -> Result<Leaderboard, ChainError>;

    async fn staker_details(&self, staker: Address) -> Result<StakerDetails, ChainError>;

    async fn staking_activity(&self, days_ago: U256) -> Result<StakingActivity, ChainError>;

    async fn paginated_stakers(
        &self,
        offset: U256,
        limit: U256,
    ) -> Result<DetailedStakerPage, ChainError>;
}

/// On-chain dashboard handle.
pub struct RpcStakingDashboard {
    contract: IStakingDashboard::IStakingDashboardInstance<DynProvider>,
}

impl RpcStakingDashboard {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            contract: IStakingDashboard::new(address, provider),
        }
    }
}

#[async_trait]
impl StakingDashboard for RpcStakingDashboard {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn seth_token(&self) -> Result<Address, ChainError> {
        self.contract
            .sETHToken()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn deth_token(&self) -> Result<Address, ChainError> {
        self.contract
            .dETHToken()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn staking_overview(&self) -> Result<StakingOverview, ChainError> {
        let overview = self
            .contract
            .getStakingOverview()
            .call()
            .await
            .map_err(contract_error)?;
        Ok(StakingOverview {
            total_eth_deposited: overview.totalETHDeposited,
            total_eth_staked: overview.totalETHStaked,
            total_stakers: overview.totalStakers,
            average_stake: overview.averageStakeAmount,
        })
    }

    async fn leaderboard(&self, count: U256) -> Result<Leaderboard, ChainError> {
        let board = self
            .contract
            .getLeaderboard(count)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(Leaderboard {
            addresses: board.stakerAddresses,
            amounts: board.stakedAmounts,
            percentages_bps: board.percentageOfTotal,
        })
    }

    async fn staker_details(&self, staker: Address) -> Result<StakerDetails, ChainError> {
        let details = self
            .contract
            .getStakerDetails(staker)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(StakerDetails {
            amount: details.stakedAmount,
            timestamp: details.stakingTimestamp,
            rank: details.rank,
            percentage_bps: details.percentageOfTotal,
        })
    }

    async fn staking_activity(&self, days_ago: U256) -> Result<StakingActivity, ChainError> {
        let activity = self
            .contract
            .getStakingActivity(days_ago)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(StakingActivity {
            active_stakers: activity.activeStakers,
            recent_stakers: activity.recentStakers,
        })
    }

    async fn paginated_stakers(
        &self,
        offset: U256,
        limit: U256,
    ) -> Result<DetailedStakerPage, ChainError> {
        let page = self
            .contract
            .getPaginatedStakersDetailed(offset, limit)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(DetailedStakerPage {
            addresses: page.stakers,
            amounts: page.amounts,
            timestamps: page.timestamps,
            ranks: page.ranks,
            percentages_bps: page.percentages,
        })
    }
}
