// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Submitted transactions and unit conversion.
//!
//! Every mutating contract call returns a [`PendingTx`] as soon as the
//! transaction is accepted by the node. Awaiting [`PendingTx::confirm`]
//! waits for inclusion and turns a reverted receipt into an error, which
//! lets callers distinguish "submitted" from "confirmed".
//!
//! Submission itself goes through a [`TransactionSender`]: the server key
//! signs locally, while a connected wallet signs and broadcasts on its own
//! (`eth_sendTransaction`). Receipts are always polled from the RPC node.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use alloy::{
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder, Provider},
    rpc::types::{TransactionReceipt, TransactionRequest},
};
use async_trait::async_trait;
use tracing::debug;

use super::client::ChainError;

/// Signs and broadcasts transactions for one account.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    /// Account every transaction is sent from.
    fn account(&self) -> Address;

    /// Submit `tx` and return its hash once the network accepted it.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ChainError>;
}

/// Hands contract calls to a [`TransactionSender`] and tracks them on the
/// read provider.
#[derive(Clone)]
pub(crate) struct Submitter {
    sender: Arc<dyn TransactionSender>,
    provider: DynProvider,
}

impl Submitter {
    pub(crate) fn new(sender: Arc<dyn TransactionSender>, provider: DynProvider) -> Self {
        Self { sender, provider }
    }

    pub(crate) async fn submit(&self, tx: TransactionRequest) -> Result<PendingTx, ChainError> {
        let from = self.sender.account();
        let tx_hash = self.sender.send_transaction(tx.from(from)).await?;
        debug!(%from, tx_hash = %tx_hash_hex(&tx_hash), "Transaction submitted");
        Ok(PendingTx::from_alloy(PendingTransactionBuilder::new(
            self.provider.root().clone(),
            tx_hash,
        )))
    }
}

type Confirmation = Pin<Box<dyn Future<Output = Result<TxReceipt, ChainError>> + Send>>;

/// Transaction receipt after confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    /// Gas actually used
    pub gas_used: u64,
}

impl TxReceipt {
    /// `0x`-prefixed, 66 character transaction hash.
    pub fn hash_hex(&self) -> String {
        tx_hash_hex(&self.tx_hash)
    }

    fn from_rpc(receipt: &TransactionReceipt) -> Result<Self, ChainError> {
        if !receipt.status() {
            return Err(ChainError::Reverted {
                tx_hash: tx_hash_hex(&receipt.transaction_hash),
            });
        }
        Ok(Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used as u64,
        })
    }
}

/// A transaction accepted by the node but not yet included in a block.
pub struct PendingTx {
    tx_hash: TxHash,
    confirmation: Confirmation,
}

impl PendingTx {
    /// Wrap a hash and the future that resolves once it is mined.
    pub fn new<F>(tx_hash: TxHash, confirmation: F) -> Self
    where
        F: Future<Output = Result<TxReceipt, ChainError>> + Send + 'static,
    {
        Self {
            tx_hash,
            confirmation: Box::pin(confirmation),
        }
    }

    /// Track an alloy pending transaction until its receipt is available.
    pub fn from_alloy(pending: PendingTransactionBuilder<alloy::network::Ethereum>) -> Self {
        let tx_hash = *pending.tx_hash();
        Self::new(tx_hash, async move {
            let receipt = pending
                .get_receipt()
                .await
                .map_err(|e| ChainError::Rpc(format!("Failed to get receipt: {e}")))?;
            TxReceipt::from_rpc(&receipt)
        })
    }

    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Wait for inclusion.
    pub async fn confirm(self) -> Result<TxReceipt, ChainError> {
        self.confirmation.await
    }
}

impl fmt::Debug for PendingTx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingTx")
            .field("tx_hash", &self.tx_hash)
            .finish_non_exhaustive()
    }
}

/// Render a transaction hash as `0x` + 64 hex characters.
pub fn tx_hash_hex(hash: &TxHash) -> String {
    alloy::hex::encode_prefixed(hash)
}

/// Parse a human-readable amount to wei (or token units).
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (18 for ETH, dETH and sETH)
pub fn parse_amount(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ChainError::InvalidAmount("Amount is empty".to_string()));
    }

    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(ChainError::InvalidAmount("Invalid amount format".to_string()));
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ChainError::InvalidAmount(format!(
            "Invalid amount format: {amount}"
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(ChainError::InvalidAmount(format!(
            "Too many decimal places (max {decimals})"
        )));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10)
            .map_err(|_| ChainError::InvalidAmount("Invalid whole number".to_string()))?
    };

    // Pad with zeros to match decimals
    let padded = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10)
            .map_err(|_| ChainError::InvalidAmount("Invalid decimal".to_string()))?
    };

    let multiplier = U256::from(10u64).pow(U256::from(decimals));
    whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| ChainError::InvalidAmount("Amount overflow".to_string()))
}

/// Parse an integer amount already expressed in wei.
pub fn parse_wei(raw: &str) -> Result<U256, ChainError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ChainError::InvalidAmount(format!(
            "Expected a non-negative integer, got `{raw}`"
        )));
    }
    U256::from_str_radix(raw, 10)
        .map_err(|_| ChainError::InvalidAmount("Amount overflow".to_string()))
}

/// Format wei (or token units) to human-readable amount.
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if amount.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / divisor;
    let remainder = amount % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = decimal_str.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, trimmed)
        }
    }
}
