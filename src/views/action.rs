// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-action transaction state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──accepted──▶ AwaitingConfirmation ──mined──▶ Succeeded
//!                      │                            │
//!                      └──────────error─────────────┴──────────────────────▶ Failed
//! ```
//!
//! While an action is `Submitting` or `AwaitingConfirmation` a new run is
//! rejected with [`ViewError::InFlight`] and nothing is sent.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Mutex;

use alloy::primitives::TxHash;

use super::ViewError;
use crate::blockchain::{ChainError, PendingTx, TxReceipt};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Submitting,
    AwaitingConfirmation {
        tx_hash: TxHash,
    },
    Succeeded {
        tx_hash: TxHash,
    },
    Failed {
        reason: String,
    },
}

impl ActionState {
    /// A transaction is being sent or mined.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            ActionState::Submitting | ActionState::AwaitingConfirmation { .. }
        )
    }
}

/// Independent action states keyed by `K` (for example a proposal id).
#[derive(Debug)]
pub struct ActionSet<K> {
    states: Mutex<HashMap<K, ActionState>>,
}

/// A single guarded action.
pub type Action = ActionSet<()>;

impl<K> Default for ActionSet<K> {
    fn default() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash + Clone> ActionSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &K) -> ActionState {
        self.lock().get(key).cloned().unwrap_or_default()
    }

    pub fn is_busy(&self, key: &K) -> bool {
        self.state(key).is_busy()
    }

    /// Submit through `submit` and wait for inclusion.
    pub async fn run<F, Fut>(&self, key: K, submit: F) -> Result<TxReceipt, ViewError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PendingTx, ChainError>>,
    {
        self.begin(&key)?;

        let pending = match submit().await {
            Ok(pending) => pending,
            Err(e) => return Err(self.fail(key, e)),
        };

        self.set(
            key.clone(),
            ActionState::AwaitingConfirmation {
                tx_hash: pending.tx_hash(),
            },
        );

        match pending.confirm().await {
            Ok(receipt) => {
                self.set(
                    key,
                    ActionState::Succeeded {
                        tx_hash: receipt.tx_hash,
                    },
                );
                Ok(receipt)
            }
            Err(e) => Err(self.fail(key, e)),
        }
    }

    fn begin(&self, key: &K) -> Result<(), ViewError> {
        let mut states = self.lock();
        let state = states.entry(key.clone()).or_default();
        if state.is_busy() {
            return Err(ViewError::InFlight);
        }
        *state = ActionState::Submitting;
        Ok(())
    }

    fn fail(&self, key: K, err: ChainError) -> ViewError {
        self.set(
            key,
            ActionState::Failed {
                reason: err.to_string(),
            },
        );
        ViewError::Chain(err)
    }

    fn set(&self, key: K, state: ActionState) {
        self.lock().insert(key, state);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, ActionState>> {
        self.states.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
