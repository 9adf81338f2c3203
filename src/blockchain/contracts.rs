// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed handles for the four EthVault contracts.
//!
//! Each contract is declared once with alloy's `sol!` macro and exposed
//! through an explicit async trait, so that the gateway, the wallet session
//! and the views only depend on named, typed methods. The `Rpc*` types are
//! the on-chain implementations; tests substitute in-memory ledgers.

use std::fmt;
use std::sync::Arc;

pub use super::dashboard::{RpcStakingDashboard, StakingDashboard};
pub use super::deth::{DepositToken, RpcDepositToken};
pub use super::governance::{GovernanceModule, RpcGovernanceModule};
pub use super::seth::{RpcStakeToken, StakeToken};

use super::client::ChainError;

/// The four contract handles, all bound to the same signer.
#[derive(Clone)]
pub struct Contracts {
    pub deth: Arc<dyn DepositToken>,
    pub seth: Arc<dyn StakeToken>,
    pub governance: Arc<dyn GovernanceModule>,
    pub dashboard: Arc<dyn StakingDashboard>,
}

impl fmt::Debug for Contracts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contracts")
            .field("deth", &self.deth.address())
            .field("seth", &self.seth.address())
            .field("governance", &self.governance.address())
            .field("dashboard", &self.dashboard.address())
            .finish()
    }
}

/// Map a contract call failure (revert, decode, transport) to [`ChainError`].
pub(crate) fn contract_error(err: alloy::contract::Error) -> ChainError {
    ChainError::Contract(err.to_string())
}
