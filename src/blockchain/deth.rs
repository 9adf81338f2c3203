// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! dETH deposit token: ETH in, dETH minted 1:1; dETH burned, ETH out.

use alloy::{
    primitives::{Address, U256},
    providers::DynProvider,
    sol,
};
use async_trait::async_trait;

use super::client::ChainError;
use super::contracts::contract_error;
use super::transactions::{PendingTx, Submitter};

sol! {
    #[sol(rpc)]
    interface IDepositToken {
        function deposit() external payable;
        function withdraw(uint256 amount) external;
        function getContractETHBalance() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function totalSupply() external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }
}

/// dETH contract interface.
#[async_trait]
pub trait DepositToken: Send + Sync {
    fn address(&self) -> Address;

    /// Deposit `value` wei of ETH, minting the same amount of dETH.
    async fn deposit(&self, value: U256) -> Result<PendingTx, ChainError>;

    /// Burn `amount` dETH and release the same amount of ETH.
    async fn withdraw(&self, amount: U256) -> Result<PendingTx, ChainError>;

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError>;

    async fn total_supply(&self) -> Result<U256, ChainError>;

    /// ETH held in reserve by the contract.
    async fn contract_eth_balance(&self) -> Result<U256, ChainError>;

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ChainError>;

    async fn approve(&self, spender: Address, amount: U256) -> Result<PendingTx, ChainError>;
}

/// On-chain dETH handle.
pub struct RpcDepositToken {
    contract: IDepositToken::IDepositTokenInstance<DynProvider>,
    submitter: Submitter,
}

impl RpcDepositToken {
    pub(crate) fn new(address: Address, provider: DynProvider, submitter: Submitter) -> Self {
        Self {
            contract: IDepositToken::new(address, provider),
            submitter,
        }
    }
}

#[async_trait]
impl DepositToken for RpcDepositToken {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn deposit(&self, value: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .deposit()
            .value(value)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }

    async fn withdraw(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .withdraw(amount)
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

    async fn total_supply(&self) -> Result<U256, ChainError> {
        self.contract
            .totalSupply()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn contract_eth_balance(&self) -> Result<U256, ChainError> {
        self.contract
            .getContractETHBalance()
            .call()
            .await
            .map_err(contract_error)
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ChainError> {
        self.contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(contract_error)
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<PendingTx, ChainError> {
        let tx = self
            .contract
            .approve(spender, amount)
            .into_transaction_request();
        self.submitter.submit(tx).await
    }
}
