// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for the EthVault contracts on Ethereum Holesky.
//!
//! This module provides:
//! - Typed handles for the dETH, sETH, governance and dashboard contracts
//! - Native ETH balance reads
//! - Transaction submission and confirmation tracking

pub mod client;
pub mod contracts;
pub mod dashboard;
pub mod deth;
pub mod governance;
pub mod seth;
pub mod signing;
pub mod transactions;
pub mod types;

pub use client::{create_signer, ChainAccess, ChainClient, ChainError};
pub use contracts::{Contracts, DepositToken, GovernanceModule, StakeToken, StakingDashboard};
pub use signing::signer_from_key;
pub use transactions::{
    format_amount, parse_amount, parse_wei, tx_hash_hex, PendingTx, TransactionSender, TxReceipt,
};
pub use types::*;
