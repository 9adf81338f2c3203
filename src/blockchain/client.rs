// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM JSON-RPC client and contract handle construction.

use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

use super::contracts::{
    Contracts, RpcDepositToken, RpcGovernanceModule, RpcStakeToken, RpcStakingDashboard,
};
use super::transactions::{Submitter, TransactionSender};
use super::types::{ContractAddresses, NetworkConfig};

/// Chain access shared by the gateway and the wallet session.
///
/// Reads go straight to the RPC endpoint; mutating calls go through the
/// contract handles returned by [`ChainAccess::bind_contracts`].
#[async_trait]
pub trait ChainAccess: Send + Sync {
    /// Native ETH balance of `account`.
    async fn native_balance(&self, account: Address) -> Result<U256, ChainError>;

    /// Latest block number, used as a liveness probe.
    async fn block_number(&self) -> Result<u64, ChainError>;

    /// Contract handles whose transactions are submitted by `sender`.
    fn bind_contracts(&self, sender: Arc<dyn TransactionSender>) -> Contracts;
}

/// JSON-RPC client for the EthVault network.
pub struct ChainClient {
    /// Network configuration
    network: NetworkConfig,
    /// Deployed contract addresses
    addresses: ContractAddresses,
    /// Read-only provider
    provider: DynProvider,
    /// Server-held key, if any
    key: Option<Arc<KeySender>>,
}

impl ChainClient {
    /// Create a read-only client for the specified network.
    pub fn new(network: NetworkConfig, addresses: ContractAddresses) -> Result<Self, ChainError> {
        let url = parse_rpc_url(&network.rpc_url)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self {
            network,
            addresses,
            provider,
            key: None,
        })
    }

    /// Attach a local signer for the gateway's own transactions.
    pub fn with_signer(mut self, signer: PrivateKeySigner) -> Result<Self, ChainError> {
        let url = parse_rpc_url(&self.network.rpc_url)?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        self.key = Some(Arc::new(KeySender { address, provider }));
        Ok(self)
    }

    /// Address of the held signer.
    pub fn signer_address(&self) -> Option<Address> {
        self.key.as_ref().map(|key| key.address)
    }

    /// Sender backed by the held signer.
    pub fn key_sender(&self) -> Option<Arc<dyn TransactionSender>> {
        self.key
            .clone()
            .map(|key| key as Arc<dyn TransactionSender>)
    }

    /// Get the network configuration.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Chain ID reported by the RPC endpoint.
    pub async fn chain_id(&self) -> Result<u64, ChainError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    /// Contract handles bound to the held signer.
    pub fn signer_contracts(&self) -> Result<Contracts, ChainError> {
        let sender = self.key_sender().ok_or(ChainError::NoSigner)?;
        Ok(self.bind_contracts(sender))
    }
}

#[async_trait]
impl ChainAccess for ChainClient {
    async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| ChainError::Rpc(e.to_string()))
    }

    fn bind_contracts(&self, sender: Arc<dyn TransactionSender>) -> Contracts {
        let provider = self.provider.clone();
        let submitter = Submitter::new(sender, provider.clone());

        Contracts {
            deth: Arc::new(RpcDepositToken::new(
                self.addresses.deth,
                provider.clone(),
                submitter.clone(),
            )),
            seth: Arc::new(RpcStakeToken::new(
                self.addresses.seth,
                provider.clone(),
                submitter.clone(),
            )),
            governance: Arc::new(RpcGovernanceModule::new(
                self.addresses.governance,
                provider.clone(),
                submitter,
            )),
            dashboard: Arc::new(RpcStakingDashboard::new(
                self.addresses.staking_dashboard,
                provider,
            )),
        }
    }
}

/// Signs with a local key; nonce, gas and fees are filled by the provider.
struct KeySender {
    address: Address,
    provider: DynProvider,
}

#[async_trait]
impl TransactionSender for KeySender {
    fn account(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ChainError> {
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ChainError::TransactionFailed(format!("Failed to send: {e}")))?;
        Ok(*pending.tx_hash())
    }
}

fn parse_rpc_url(raw: &str) -> Result<url::Url, ChainError> {
    raw.parse()
        .map_err(|e: url::ParseError| ChainError::InvalidRpcUrl(e.to_string()))
}

/// Create a signer from a hex-encoded private key (with or without `0x`).
pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, ChainError> {
    let trimmed = private_key_hex.trim();
    let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let key_bytes = alloy::hex::decode(trimmed)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(e.to_string()))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No signer configured")]
    NoSigner,

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },
}
