// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use alloy::primitives::Address;

use crate::blockchain::{ChainAccess, Contracts, TransactionSender};

/// Shared gateway state: the chain client and the handles bound to the
/// server-held signer.
#[derive(Clone)]
pub struct AppState {
    pub chain: Arc<dyn ChainAccess>,
    pub contracts: Contracts,
    pub signer: Address,
}

impl AppState {
    /// Bind the four contracts to the server's `sender` through `chain`.
    pub fn new(chain: Arc<dyn ChainAccess>, sender: Arc<dyn TransactionSender>) -> Self {
        let signer = sender.account();
        let contracts = chain.bind_contracts(sender);
        Self {
            chain,
            contracts,
            signer,
        }
    }
}
