// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deposit ETH for dETH and withdraw it back.

use std::sync::Arc;

use alloy::primitives::U256;

use super::action::{Action, ActionState};
use super::{confirmed, connected, parse_positive_amount, surface, ViewError, TOKEN_DECIMALS};
use crate::blockchain::{format_amount, TxReceipt};
use crate::session::SessionManager;

/// ETH kept back from "max" deposits to pay for gas (0.01 ETH).
pub const GAS_RESERVE_WEI: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

pub struct DepositView {
    session: Arc<SessionManager>,
    deposit: Action,
    withdraw: Action,
}

impl DepositView {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            deposit: Action::new(),
            withdraw: Action::new(),
        }
    }

    pub fn deposit_state(&self) -> ActionState {
        self.deposit.state(&())
    }

    pub fn withdraw_state(&self) -> ActionState {
        self.withdraw.state(&())
    }

    /// Largest deposit that leaves the gas reserve; `None` if the balance
    /// does not exceed it.
    pub fn max_deposit(&self) -> Option<String> {
        let eth = self.session.balances().eth;
        (eth > GAS_RESERVE_WEI).then(|| format_amount(eth - GAS_RESERVE_WEI, TOKEN_DECIMALS))
    }

    pub fn max_withdraw(&self) -> String {
        format_amount(self.session.balances().deth, TOKEN_DECIMALS)
    }

    /// Deposit `amount` ETH.
    pub async fn deposit(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let result = self.try_deposit(amount).await;
        surface(&self.session, "Deposit", result)
    }

    async fn try_deposit(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let value = parse_positive_amount(amount)?;
        if value > self.session.balances().eth {
            return Err(ViewError::Validation("Insufficient ETH balance".to_string()));
        }

        let receipt = self
            .deposit
            .run((), || session.contracts.deth.deposit(value))
            .await?;
        confirmed(&self.session, "Deposit", &receipt).await;
        Ok(receipt)
    }

    /// Withdraw `amount` dETH.
    pub async fn withdraw(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let result = self.try_withdraw(amount).await;
        surface(&self.session, "Withdrawal", result)
    }

    async fn try_withdraw(&self, amount: &str) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let value = parse_positive_amount(amount)?;
        if value > self.session.balances().deth {
            return Err(ViewError::Validation("Insufficient dETH balance".to_string()));
        }

        let receipt = self
            .withdraw
            .run((), || session.contracts.deth.withdraw(value))
            .await?;
        confirmed(&self.session, "Withdrawal", &receipt).await;
        Ok(receipt)
    }
}
