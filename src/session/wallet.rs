// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Injected wallet boundary (EIP-1193 style).
//!
//! The session manager drives a browser or desktop wallet through this
//! trait. Only the requests the session needs are modelled; numeric
//! EIP-1193 error codes are mapped to [`WalletError`] by implementors via
//! [`WalletError::from_rpc`].

use std::sync::Arc;

use alloy::{
    primitives::{Address, TxHash},
    rpc::types::TransactionRequest,
};
use async_trait::async_trait;

use crate::blockchain::{ChainError, NetworkConfig, TransactionSender};

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-3085 code for a chain the wallet does not know.
pub const UNKNOWN_CHAIN_CODE: i64 = 4902;

/// Errors reported by the injected wallet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet detected. Please install MetaMask or a compatible wallet.")]
    NotInstalled,

    #[error("Request rejected by user")]
    UserRejected,

    #[error("Chain is not configured in the wallet")]
    UnknownChain,

    #[error("No accounts available")]
    NoAccounts,

    #[error("Wallet error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl WalletError {
    /// Classify a raw EIP-1193 error.
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        match code {
            USER_REJECTED_CODE => WalletError::UserRejected,
            UNKNOWN_CHAIN_CODE => WalletError::UnknownChain,
            _ => WalletError::Rpc {
                code,
                message: message.into(),
            },
        }
    }
}

/// Native currency metadata for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters for `wallet_addEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddChainParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl AddChainParams {
    /// Hex chain id as the wallet expects it (`0x4268` for Holesky).
    pub fn chain_id_hex(&self) -> String {
        format!("{:#x}", self.chain_id)
    }
}

impl From<&NetworkConfig> for AddChainParams {
    fn from(network: &NetworkConfig) -> Self {
        Self {
            chain_id: network.chain_id,
            chain_name: network.name.clone(),
            native_currency: NativeCurrency {
                name: "ETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![network.rpc_url.clone()],
            block_explorer_urls: vec![network.explorer_url.clone()],
        }
    }
}

/// Notifications pushed by the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

/// An injected EIP-1193 wallet.
#[async_trait]
pub trait InjectedWallet: Send + Sync {
    /// `eth_requestAccounts`: prompts the user if not yet authorized.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// `eth_accounts`: authorized accounts, never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64, WalletError>;

    /// `wallet_switchEthereumChain`.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError>;

    /// `wallet_addEthereumChain`.
    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError>;

    /// `eth_sendTransaction`: the wallet fills, signs and broadcasts `tx`,
    /// usually after asking the user.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError>;
}

/// [`TransactionSender`] that asks the wallet to send for `account`.
pub struct WalletSender {
    wallet: Arc<dyn InjectedWallet>,
    account: Address,
}

impl WalletSender {
    pub fn new(wallet: Arc<dyn InjectedWallet>, account: Address) -> Self {
        Self { wallet, account }
    }
}

#[async_trait]
impl TransactionSender for WalletSender {
    fn account(&self) -> Address {
        self.account
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ChainError> {
        self.wallet.send_transaction(tx).await.map_err(|e| match e {
            WalletError::Chain(e) => e,
            other => ChainError::TransactionFailed(other.to_string()),
        })
    }
}
