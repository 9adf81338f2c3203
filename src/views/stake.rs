// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stake dETH for sETH and unstake it back.
//!
//! Staking pulls dETH through `transferFrom`, so the sETH contract needs a
//! dETH allowance first. While the allowance is zero only approval is
//! offered; approval grants the maximum amount.

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use tracing::warn;

use super::action::{Action, ActionState};
use super::{confirmed, connected, parse_positive_amount, surface, ViewError, TOKEN_DECIMALS};
use crate::blockchain::{format_amount, ChainError, Contracts, TxReceipt};
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StakeData {
    pub loading: bool,
    /// dETH allowance granted to the sETH contract.
    pub allowance: U256,
}

impl Default for StakeData {
    fn default() -> Self {
        Self {
            loading: true,
            allowance: U256::ZERO,
        }
    }
}

pub struct StakeView {
    session: Arc<SessionManager>,
    data: Mutex<StakeData>,
    approve: Action,
    stake: Action,
    unstake: Action,
}

impl StakeView {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            data: Mutex::new(StakeData::default()),
            approve: Action::new(),
            stake: Action::new(),
            unstake: Action::new(),
        }
    }

    pub fn data(&self) -> StakeData {
        self.lock().clone()
    }

    pub fn approve_state(&self) -> ActionState {
        self.approve.state(&())
    }

    pub fn stake_state(&self) -> ActionState {
        self.stake.state(&())
    }

    pub fn unstake_state(&self) -> ActionState {
        self.unstake.state(&())
    }

    /// Approval is needed and not already in flight.
    pub fn approve_enabled(&self) -> bool {
        let data = self.lock();
        !data.loading && data.allowance.is_zero() && !self.approve.is_busy(&())
    }

    pub fn stake_enabled(&self) -> bool {
        let data = self.lock();
        !data.loading && !data.allowance.is_zero() && !self.stake.is_busy(&())
    }

    pub fn max_stake(&self) -> String {
        format_amount(self.session.balances().deth, TOKEN_DECIMALS)
    }

    pub fn max_unstake(&self) -> String {
        format_amount(self.session.balances().seth, TOKEN_DECIMALS)
    }

    /// Read the current dETH allowance of the sETH contract.
    pub async fn load(&self) -> Result<(), ViewError> {
        let result = async {
            let session = connected(&self.session)?;
            Ok::<_, ViewError>(read_allowance(&session.contracts, session.account).await?)
        }
        .await;

        let mut data = self.lock();
        data.loading = false;
        match result {
            Ok(allowance) => {
                data.allowance = allowance;
                Ok(())
            }
            Err(e) => {
                drop(data);
                warn!(error = %e, "Allowance read failed");
                surface(&self.session, "Loading Allowance", Err(e))
            }
        }
    }

    /// Grant the sETH contract an unlimited dETH allowance.
    pub async fn approve(&self) -> Result<TxReceipt, ViewError> {
        let result = self.try_approve().await;
        surface(&self.session, "Approval", result)
    }

    async fn try_approve(&self) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let spender = session.contracts.seth.address();
        let receipt = self
            .approve
            .run((), || session.contracts.deth.approve(spender, U256::MAX))
            .await?;
        confirmed(&self.session, "Approval", &receipt).await;
        self.reload_allowance(&session.contracts, session.account)
            .await;
        Ok(receipt)
    }

    /// Stake `amount` dETH.
    pub async fn stake(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let result = self.try_stake(amount).await;
        surface(&self.session, "Stake", result)
    }

    async fn try_stake(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let value = parse_positive_amount(amount)?;
        if self.lock().allowance < value {
            return Err(ViewError::Validation(
                "Insufficient allowance. Please approve dETH first".to_string(),
            ));
        }
        if value > self.session.balances().deth {
            return Err(ViewError::Validation("Insufficient dETH balance".to_string()));
        }

        let receipt = self
            .stake
            .run((), || session.contracts.seth.stake(value))
            .await?;
        confirmed(&self.session, "Stake", &receipt).await;
        self.reload_allowance(&session.contracts, session.account)
            .await;
        Ok(receipt)
    }

    /// Unstake `amount` sETH.
    pub async fn unstake(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let result = self.try_unstake(amount).await;
        surface(&self.session, "Unstake", result)
    }

    async fn try_unstake(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let value = parse_positive_amount(amount)?;
        if value > self.session.balances().seth {
            return Err(ViewError::Validation("Insufficient sETH balance".to_string()));
        }

        let receipt = self
            .unstake
            .run((), || session.contracts.seth.unstake(value))
            .await?;
        confirmed(&self.session, "Unstake", &receipt).await;
        Ok(receipt)
    }

    async fn reload_allowance(&self, contracts: &Contracts, owner: Address) {
        match read_allowance(contracts, owner).await {
            Ok(allowance) => self.lock().allowance = allowance,
            Err(e) => warn!(error = %e, "Allowance re-read failed"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StakeData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn read_allowance(
    contracts: &Contracts,
    owner: Address,
) -> Result<U256, ChainError> {
    contracts
        .deth
        .allowance(owner, contracts.seth.address())
        .await
}
