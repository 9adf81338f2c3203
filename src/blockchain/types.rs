// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use alloy::primitives::{address, Address, U256};

/// EVM network configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Network name for display
    pub name: String,
    /// Chain ID
    pub chain_id: u64,
    /// RPC endpoint URL
    pub rpc_url: String,
    /// Block explorer URL
    pub explorer_url: String,
}

/// Chain ID of the Ethereum Holesky testnet.
pub const HOLESKY_CHAIN_ID: u64 = 17000;

/// Public Holesky RPC endpoint.
pub const HOLESKY_RPC_URL: &str = "https://ethereum-holesky-rpc.publicnode.com";

/// Holesky block explorer.
pub const HOLESKY_EXPLORER_URL: &str = "https://holesky.etherscan.io";

impl NetworkConfig {
    /// Ethereum Holesky testnet configuration.
    pub fn holesky() -> Self {
        Self {
            name: "Ethereum Testnet".to_string(),
            chain_id: HOLESKY_CHAIN_ID,
            rpc_url: HOLESKY_RPC_URL.to_string(),
            explorer_url: HOLESKY_EXPLORER_URL.to_string(),
        }
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url, tx_hash)
    }
}

/// Deployed EthVault contract addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    /// dETH deposit token
    pub deth: Address,
    /// sETH staking token
    pub seth: Address,
    /// Governance module
    pub governance: Address,
    /// Read-only staking dashboard
    pub staking_dashboard: Address,
}

/// Holesky deployment.
pub const HOLESKY_CONTRACTS: ContractAddresses = ContractAddresses {
    deth: address!("520d7dAB4A5bCE6ceA323470dbffCea14b78253a"),
    seth: address!("16b0cD88e546a90DbE380A63EbfcB487A9A05D8e"),
    governance: address!("D396FE92075716598FAC875D12E708622339FA3e"),
    staking_dashboard: address!("d33e9676463597AfFF5bB829796836631F4e2f1f"),
};

impl Default for ContractAddresses {
    fn default() -> Self {
        HOLESKY_CONTRACTS
    }
}

/// ETH / dETH / sETH balances of one account, all in wei.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub eth: U256,
    pub deth: U256,
    pub seth: U256,
}

/// Per-user stake record as held by the sETH contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakeInfo {
    pub amount: U256,
    pub timestamp: U256,
    pub rank: U256,
}

/// Addresses and amounts of the largest stakers, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopStakers {
    pub addresses: Vec<Address>,
    pub amounts: Vec<U256>,
}

/// One page of stakers from the sETH contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakerPage {
    pub addresses: Vec<Address>,
    pub amounts: Vec<U256>,
    pub timestamps: Vec<U256>,
    pub ranks: Vec<U256>,
}

/// One page of stakers from the dashboard, with share of total stake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailedStakerPage {
    pub addresses: Vec<Address>,
    pub amounts: Vec<U256>,
    pub timestamps: Vec<U256>,
    pub ranks: Vec<U256>,
    /// Share of total stake in basis points (2550 = 25.50%).
    pub percentages_bps: Vec<U256>,
}

/// Protocol-wide totals from the staking dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakingOverview {
    pub total_eth_deposited: U256,
    pub total_eth_staked: U256,
    pub total_stakers: U256,
    pub average_stake: U256,
}

/// Leaderboard columns as returned by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub addresses: Vec<Address>,
    pub amounts: Vec<U256>,
    /// Share of total stake in basis points.
    pub percentages_bps: Vec<U256>,
}

/// Dashboard view of a single staker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakerDetails {
    pub amount: U256,
    pub timestamp: U256,
    pub rank: U256,
    /// Share of total stake in basis points.
    pub percentage_bps: U256,
}

/// Stakers active within a look-back window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StakingActivity {
    pub active_stakers: U256,
    pub recent_stakers: Vec<Address>,
}

/// Governance tuning parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GovernanceParams {
    pub voting_period: U256,
    pub execution_delay: U256,
    pub quorum: U256,
}

/// Running vote totals of a proposal, weighted by sETH.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub votes_for: U256,
    pub votes_against: U256,
}

/// Lifecycle state of a governance proposal, as encoded by the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProposalState {
    Active,
    Defeated,
    Succeeded,
    Executed,
    Expired,
    Canceled,
    /// A discriminant this client does not know about.
    Unknown(u8),
}

impl ProposalState {
    /// Raw `uint8` discriminant.
    pub fn as_u8(self) -> u8 {
        match self {
            ProposalState::Active => 0,
            ProposalState::Defeated => 1,
            ProposalState::Succeeded => 2,
            ProposalState::Executed => 3,
            ProposalState::Expired => 4,
            ProposalState::Canceled => 5,
            ProposalState::Unknown(raw) => raw,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ProposalState::Active => "Active",
            ProposalState::Defeated => "Defeated",
            ProposalState::Succeeded => "Succeeded",
            ProposalState::Executed => "Executed",
            ProposalState::Expired => "Expired",
            ProposalState::Canceled => "Canceled",
            ProposalState::Unknown(_) => "Unknown",
        }
    }
}

impl From<u8> for ProposalState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => ProposalState::Active,
            1 => ProposalState::Defeated,
            2 => ProposalState::Succeeded,
            3 => ProposalState::Executed,
            4 => ProposalState::Expired,
            5 => ProposalState::Canceled,
            other => ProposalState::Unknown(other),
        }
    }
}

/// A voter's recorded choice on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChoice {
    None,
    For,
    Against,
    Unknown(u8),
}

impl VoteChoice {
    pub fn as_u8(self) -> u8 {
        match self {
            VoteChoice::None => 0,
            VoteChoice::For => 1,
            VoteChoice::Against => 2,
            VoteChoice::Unknown(raw) => raw,
        }
    }
}

impl From<u8> for VoteChoice {
    fn from(raw: u8) -> Self {
        match raw {
            0 => VoteChoice::None,
            1 => VoteChoice::For,
            2 => VoteChoice::Against,
            other => VoteChoice::Unknown(other),
        }
    }
}

/// Full proposal record from `getProposalDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalDetails {
    pub proposer: Address,
    pub description: String,
    pub created_at: U256,
    pub votes_for: U256,
    pub votes_against: U256,
    pub executed: bool,
    pub canceled: bool,
    pub state: ProposalState,
}
