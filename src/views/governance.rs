// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Governance proposals: list, create, vote, execute, cancel.
//!
//! Each proposal id has its own action guard, so acting on one proposal
//! never blocks another. After a mutation only the affected entry is
//! re-read and replaced.

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, Bytes, U256};
use futures::future::try_join_all;
use tracing::warn;

use super::action::{Action, ActionSet, ActionState};
use super::format::format_timestamp;
use super::{confirmed, connected, surface, ViewError};
use crate::blockchain::{ProposalDetails, ProposalState, TxReceipt};
use crate::session::SessionManager;

/// sETH needed to open a proposal (1 sETH).
pub const MIN_PROPOSAL_STAKE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// A mirrored proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalEntry {
    pub id: U256,
    pub details: ProposalDetails,
}

impl ProposalEntry {
    pub fn created(&self) -> String {
        format_timestamp(self.details.created_at)
    }
}

/// Buttons a proposal offers to the current account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalAction {
    VoteFor,
    VoteAgainst,
    Execute,
    Cancel,
}

/// Actions available on `proposal` for `account`.
///
/// Vote while Active, execute once Succeeded, cancel while Active and only
/// by the proposer. Addresses compare on bytes, so checksum casing is
/// irrelevant.
pub fn available_actions(
    proposal: &ProposalDetails,
    account: Option<Address>,
) -> Vec<ProposalAction> {
    match proposal.state {
        ProposalState::Active => {
            let mut actions = vec![ProposalAction::VoteFor, ProposalAction::VoteAgainst];
            if account == Some(proposal.proposer) {
                actions.push(ProposalAction::Cancel);
            }
            actions
        }
        ProposalState::Succeeded => vec![ProposalAction::Execute],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GovernanceData {
    pub loading: bool,
    pub proposals: Vec<ProposalEntry>,
}

impl Default for GovernanceData {
    fn default() -> Self {
        Self {
            loading: true,
            proposals: Vec::new(),
        }
    }
}

pub struct GovernanceView {
    session: Arc<SessionManager>,
    data: Mutex<GovernanceData>,
    create: Action,
    proposal_actions: ActionSet<U256>,
}

impl GovernanceView {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            data: Mutex::new(GovernanceData::default()),
            create: Action::new(),
            proposal_actions: ActionSet::new(),
        }
    }

    pub fn data(&self) -> GovernanceData {
        self.lock().clone()
    }

    pub fn create_state(&self) -> ActionState {
        self.create.state(&())
    }

    pub fn proposal_state(&self, id: U256) -> ActionState {
        self.proposal_actions.state(&id)
    }

    /// Actions for proposal `id`, empty while one of its transactions is pending.
    pub fn actions_for(&self, id: U256) -> Vec<ProposalAction> {
        if self.proposal_actions.is_busy(&id) {
            return Vec::new();
        }
        let account = self.session.session().map(|s| s.account);
        self.lock()
            .proposals
            .iter()
            .find(|p| p.id == id)
            .map(|p| available_actions(&p.details, account))
            .unwrap_or_default()
    }

    /// Fetch every proposal `0..proposalCount` concurrently.
    pub async fn load(&self) -> Result<(), ViewError> {
        let result = self.fetch_all().await;
        let mut data = self.lock();
        data.loading = false;
        match result {
            Ok(proposals) => {
                data.proposals = proposals;
                Ok(())
            }
            Err(e) => {
                drop(data);
                warn!(error = %e, "Proposal load failed");
                surface(&self.session, "Loading Proposals", Err(e))
            }
        }
    }

    async fn fetch_all(&self) -> Result<Vec<ProposalEntry>, ViewError> {
        let session = connected(&self.session)?;
        let governance = &session.contracts.governance;
        let count = governance.proposal_count().await?;
        let count = u64::try_from(count)
            .map_err(|_| ViewError::Validation("Proposal count out of range".to_string()))?;

        let details = try_join_all(
            (0..count).map(|i| governance.proposal_details(U256::from(i))),
        )
        .await?;

        Ok(details
            .into_iter()
            .enumerate()
            .map(|(i, details)| ProposalEntry {
                id: U256::from(i),
                details,
            })
            .collect())
    }

    /// Open a proposal. `call_data` is free text sent as its UTF-8 bytes.
    pub async fn create(
        &self,
        description: &str,
        target: &str,
        call_data: &str,
    ) -> Result<TxReceipt, ViewError> {
        let result = self.try_create(description, target, call_data).await;
        surface(&self.session, "Proposal Creation", result)
    }

    async fn try_create(
        &self,
        description: &str,
        target: &str,
        call_data: &str,
    ) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let description = description.trim();
        let target = target.trim();
        if description.is_empty() || target.is_empty() {
            return Err(ViewError::Validation(
                "Description and target address are required".to_string(),
            ));
        }
        let target: Address = target
            .parse()
            .map_err(|_| ViewError::Validation("Invalid target address".to_string()))?;
        if self.session.balances().seth < MIN_PROPOSAL_STAKE {
            return Err(ViewError::Validation(
                "You need at least 1 sETH to create a proposal".to_string(),
            ));
        }
        let call_data = Bytes::copy_from_slice(call_data.as_bytes());
        let description = description.to_string();

        let receipt = self
            .create
            .run((), || {
                session
                    .contracts
                    .governance
                    .create_proposal(description, target, call_data)
            })
            .await?;
        confirmed(&self.session, "Proposal Creation", &receipt).await;
        // A failed reload is reported by `load`; the transaction still stands.
        self.load().await.ok();
        Ok(receipt)
    }

    /// Vote on proposal `id`, weighted by the account's sETH.
    pub async fn vote(&self, id: U256, support: bool) -> Result<TxReceipt, ViewError> {
        let result = self.try_vote(id, support).await;
        surface(&self.session, "Vote", result)
    }

    async fn try_vote(&self, id: U256, support: bool) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        if self.session.balances().seth.is_zero() {
            return Err(ViewError::Validation(
                "You need sETH to vote".to_string(),
            ));
        }
        let receipt = self
            .proposal_actions
            .run(id, || session.contracts.governance.cast_vote(id, support))
            .await?;
        confirmed(&self.session, "Vote", &receipt).await;
        self.replace_entry(id).await;
        Ok(receipt)
    }

    pub async fn execute(&self, id: U256) -> Result<TxReceipt, ViewError> {
        let result = self.try_execute(id).await;
        surface(&self.session, "Execution", result)
    }

    async fn try_execute(&self, id: U256) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let receipt = self
            .proposal_actions
            .run(id, || session.contracts.governance.execute_proposal(id))
            .await?;
        confirmed(&self.session, "Execution", &receipt).await;
        self.replace_entry(id).await;
        Ok(receipt)
    }

    pub async fn cancel(&self, id: U256) -> Result<TxReceipt, ViewError> {
        let result = self.try_cancel(id).await;
        surface(&self.session, "Cancellation", result)
    }

    async fn try_cancel(&self, id: U256) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let receipt = self
            .proposal_actions
            .run(id, || session.contracts.governance.cancel_proposal(id))
            .await?;
        confirmed(&self.session, "Cancellation", &receipt).await;
        self.replace_entry(id).await;
        Ok(receipt)
    }

    /// Re-read proposal `id` and swap it into the list.
    async fn replace_entry(&self, id: U256) {
        let Some(session) = self.session.session() else {
            return;
        };
        match session.contracts.governance.proposal_details(id).await {
            Ok(details) => {
                let mut data = self.lock();
                match data.proposals.iter_mut().find(|p| p.id == id) {
                    Some(entry) => entry.details = details,
                    None => data.proposals.push(ProposalEntry { id, details }),
                }
            }
            Err(e) => warn!(proposal_id = %id, error = %e, "Proposal re-read failed"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GovernanceData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
