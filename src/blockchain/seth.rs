// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! sETH staking token.
//!
//! Staking pulls dETH from the caller, so the sETH contract must first hold
//! a dETH allowance from the staker.

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainError;
use super::contracts::contract_error;
use super::transactions::{PendingTx, Submitter};
use super::types::{StakeInfo, StakerPage, TopStakers};

sol! {
    #[sol(rpc)]
    interface IStakeToken {
        function balanceOf(address account) external view returns (uint256);
        function dETHToken() external view returns (address);
        function totalStaked() external view returns (uint256);
        function totalStakers() external view returns (uint256);
        function stake(uint256 amount) external;
        function unstake(uint256 amount) external;
        function getStakeInfo(address user) external view returns (uint256 amount, uint256 timestamp, uint256 rank);
        function getAllStakers() external view returns (address[] memory);
        function getTopStakers(uint256 count) external view returns (address[] memory addresses, uint256[] memory amounts);
        function getPaginatedStakers(uint256 offset, uint256 limit) external view returns (address[] memory addresses, uint256[] memory amounts, uint256[] memory timestamps, uint256[] memory ranks);
        function updateLeaderboard() external;
    }
}

/// sETH contract interface.
#[async_trait]
pub trait StakeToken: Send + Sync {
    fn address(&self) -> Address;

    async fn stake(&self, amount: U256) -> Result<PendingTx, ChainError>;

    async fn unstake(&self, amount: U256) -> Result<PendingTx, ChainError>;

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError>;

    /// Address of the dETH token this contract stakes.
    async fn deth_token(&self) -> Result<Address, ChainError>;

    async fn total_staked(&self) -> Result<U256, ChainError>;

    async fn total_stakers(&self) -> Result<U256, ChainError>;

    async fn stake_info(&self, user: Address) -> Result<StakeInfo, ChainError>;

    async fn all_stakers(&self) -> Result<Vec<Address>, ChainError>;

    async fn top_stakers(&self, count: U256) -> Result<TopStakers, ChainError>;

    async fn paginated_stakers(&self, offset: U256, limit: U256)
        -> Result<StakerPage, ChainError>;

    /// Recompute the on-chain ranking.
    async fn update_leaderboard(&self) -> Result<PendingTx, ChainError>;
}

/// On-chain sETH handle.
pub struct RpcStakeToken {
    contract: IStakeToken::IStakeTokenInstance<DynProvider>,
    submitter: Submitter,
}

impl RpcStakeToken {
    pub(crate) fn new(address: Address, provider: DynProvider, submitter: Submitter) -> Self {
        Self {
            contract: IStakeToken::new(address, provider),
            submitter,
        }
    }
}

#[async_trait]
impl StakeToken for RpcStakeToken {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn stake(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .stake(amount)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn unstake(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .unstake(amount)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.contract
            .balanceOf(account)
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

    async fn total_staked(&self) -> Result<U256, ChainError> {
        self.contract
            .totalStaked()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn total_stakers(&self) -> Result<U256, ChainError> {
        self.contract
            .totalStakers()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn stake_info(&self, user: Address) -> Result<StakeInfo, ChainError> {
        let info = self
            .contract
            .getStakeInfo(user)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(StakeInfo {
            amount: info.amount,
            timestamp: info.timestamp,
            rank: info.rank,
        })
    }

    async fn all_stakers(&self) -> Result<Vec<Address>, ChainError> {
        self.contract
            .getAllStakers()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn top_stakers(&self, count: U256) -> Result<TopStakers, ChainError> {
        let top = self
            .contract
            .getTopStakers(count)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(TopStakers {
            addresses: top.addresses,
            amounts: top.amounts,
        })
    }

    async fn paginated_stakers(
        &self,
        offset: U256,
        limit: U256,
    ) -> Result<StakerPage, ChainError> {
        let page = self
            .contract
            .getPaginatedStakers(offset, limit)
            .call()
            .await
            .map_err(contract_error)?;
        Ok(StakerPage {
            addresses: page.addresses,
            amounts: page.amounts,
            timestamps: page.timestamps,
            ranks: page.ranks,
        })
    }

    async fn update_leaderboard(&self) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .updateLeaderboard()
            .into_transaction_request();
        self.submitter.submit(tx).await
    }
}
