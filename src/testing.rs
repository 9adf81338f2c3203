// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory stand-ins for the contracts and the injected wallet.
//!
//! [`Ledger`] keeps just enough state to mimic the four EthVault contracts.
//! Every transaction is applied at submission time; confirmation can be held
//! back with [`Ledger::hold_confirmations`] to observe in-flight states.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{address, Address, Bytes, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::blockchain::{
    ChainAccess, ChainError, Contracts, DepositToken, DetailedStakerPage, GovernanceModule,
    GovernanceParams, Leaderboard, PendingTx, ProposalDetails, ProposalState, StakeInfo,
    StakeToken, StakerDetails, StakerPage, StakingActivity, StakingDashboard, StakingOverview,
    TopStakers, TransactionSender, TxReceipt, VoteChoice, VoteTally,
};
use crate::notify::{Notification, Notifier};
use crate::session::{AddChainParams, InjectedWallet, WalletError};
use crate::state::AppState;

pub const DETH: Address = address!("00000000000000000000000000000000000000d1");
pub const SETH: Address = address!("00000000000000000000000000000000000000d2");
pub const GOVERNANCE: Address = address!("00000000000000000000000000000000000000d3");
pub const DASHBOARD: Address = address!("00000000000000000000000000000000000000d4");

pub const ALICE: Address = address!("a11ce00000000000000000000000000000000001");
pub const BOB: Address = address!("b0b0000000000000000000000000000000000002");
pub const CAROL: Address = address!("ca401000000000000000000000000000000000c3");

/// `n` whole ether in wei.
pub fn eth(n: u64) -> U256 {
    U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
}

fn to_index(value: U256) -> usize {
    u64::try_from(value)
        .ok()
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(usize::MAX)
}

#[derive(Default)]
struct LedgerState {
    eth: HashMap<Address, U256>,
    deth: HashMap<Address, U256>,
    seth: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    contract_eth: U256,
    /// Stakers in order of first stake: (address, amount, timestamp).
    stakers: Vec<(Address, U256, U256)>,
    proposals: Vec<ProposalDetails>,
    votes: HashMap<(usize, Address), VoteChoice>,
    params: GovernanceParams,
    submitted: Vec<&'static str>,
    block: u64,
    fail_next: Option<String>,
    revert_next: bool,
    fail_reads: bool,
}

impl LedgerState {
    fn balance(map: &HashMap<Address, U256>, account: Address) -> U256 {
        map.get(&account).copied().unwrap_or_default()
    }

    fn total_staked(&self) -> U256 {
        self.stakers
            .iter()
            .fold(U256::ZERO, |acc, (_, amount, _)| acc + *amount)
    }

    /// Stakers sorted by amount, largest first.
    fn ranked(&self) -> Vec<(Address, U256, U256)> {
        let mut ranked = self.stakers.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn rank_of(&self, account: Address) -> U256 {
        self.ranked()
            .iter()
            .position(|(a, _, _)| *a == account)
            .map(|i| U256::from(i + 1))
            .unwrap_or_default()
    }

    fn share_bps(&self, amount: U256) -> U256 {
        let total = self.total_staked();
        if total.is_zero() {
            U256::ZERO
        } else {
            amount * U256::from(10_000u64) / total
        }
    }

    fn proposal_index(&self, id: U256) -> Result<usize, String> {
        Some(to_index(id))
            .filter(|i| *i < self.proposals.len())
            .ok_or_else(|| "Invalid proposal ID".to_string())
    }
}

/// Shared in-memory chain.
#[derive(Default)]
pub struct Ledger {
    state: Mutex<LedgerState>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl Ledger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state.lock().unwrap()
    }

    pub fn fund(&self, account: Address, wei: U256) {
        *self.lock().eth.entry(account).or_default() += wei;
    }

    pub fn set_deth(&self, account: Address, wei: U256) {
        self.lock().deth.insert(account, wei);
    }

    /// Give `account` a stake of `wei`, as if it had staked earlier.
    pub fn set_stake(&self, account: Address, wei: U256) {
        let mut state = self.lock();
        state.seth.insert(account, wei);
        let block = U256::from(state.block);
        match state.stakers.iter().position(|(a, _, _)| *a == account) {
            Some(i) => state.stakers[i].1 = wei,
            None => state.stakers.push((account, wei, block)),
        }
    }

    pub fn set_allowance(&self, owner: Address, spender: Address, wei: U256) {
        self.lock().allowances.insert((owner, spender), wei);
    }

    pub fn eth_of(&self, account: Address) -> U256 {
        LedgerState::balance(&self.lock().eth, account)
    }

    pub fn deth_of(&self, account: Address) -> U256 {
        LedgerState::balance(&self.lock().deth, account)
    }

    pub fn seth_of(&self, account: Address) -> U256 {
        LedgerState::balance(&self.lock().seth, account)
    }

    /// Insert a proposal directly, bypassing the sETH threshold.
    pub fn add_proposal(&self, proposer: Address, description: &str, state: ProposalState) {
        let mut ledger = self.lock();
        let created_at = U256::from(ledger.block);
        ledger.proposals.push(ProposalDetails {
            proposer,
            description: description.to_string(),
            created_at,
            votes_for: U256::ZERO,
            votes_against: U256::ZERO,
            executed: false,
            canceled: false,
            state,
        });
    }

    pub fn set_proposal_state(&self, index: usize, state: ProposalState) {
        self.lock().proposals[index].state = state;
    }

    pub fn proposal(&self, index: usize) -> ProposalDetails {
        self.lock().proposals[index].clone()
    }

    /// Names of the contract methods submitted so far, in order.
    pub fn submitted(&self) -> Vec<&'static str> {
        self.lock().submitted.clone()
    }

    /// The next submission fails at send time with `message`.
    pub fn fail_next_send(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    /// The next submission is mined but reverts.
    pub fn revert_next(&self) {
        self.lock().revert_next = true;
    }

    /// Make every read fail with an RPC error.
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    /// Hold confirmations of transactions submitted from now on until
    /// [`Ledger::release_confirmations`] is called.
    pub fn hold_confirmations(&self) {
        *self.gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_confirmations(&self) {
        if let Some(gate) = self.gate.lock().unwrap().take() {
            gate.add_permits(1024);
        }
    }

    /// Contract handles whose transactions are sent by `signer`.
    pub fn bind(self: &Arc<Self>, signer: Arc<dyn TransactionSender>) -> Contracts {
        let binding = Arc::new(FakeBinding {
            ledger: Arc::clone(self),
            sender: signer.account(),
            signer,
        });
        Contracts {
            deth: binding.clone(),
            seth: binding.clone(),
            governance: binding.clone(),
            dashboard: binding,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&LedgerState) -> Result<T, String>) -> Result<T, ChainError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        f(&*state).map_err(|reason| ChainError::Contract(format!("execution reverted: {reason}")))
    }

    fn submit(
        &self,
        method: &'static str,
        apply: impl FnOnce(&mut LedgerState) -> Result<(), String>,
    ) -> Result<PendingTx, ChainError> {
        let mut state = self.lock();
        if let Some(message) = state.fail_next.take() {
            return Err(ChainError::TransactionFailed(format!("Failed to send: {message}")));
        }
        let revert = std::mem::take(&mut state.revert_next);
        if !revert {
            apply(&mut *state).map_err(|reason| {
                ChainError::TransactionFailed(format!("Failed to send: execution reverted: {reason}"))
            })?;
        }
        state.submitted.push(method);
        state.block += 1;

        let tx_hash = B256::from(U256::from(state.block));
        let block_number = state.block;
        drop(state);

        let gate = self.gate.lock().unwrap().clone();
        Ok(PendingTx::new(tx_hash, async move {
            if let Some(gate) = gate {
                let _permit = gate
                    .acquire()
                    .await
                    .map_err(|e| ChainError::Rpc(e.to_string()))?;
            }
            if revert {
                return Err(ChainError::Reverted {
                    tx_hash: crate::blockchain::tx_hash_hex(&tx_hash),
                });
            }
            Ok(TxReceipt {
                tx_hash,
                block_number: Some(block_number),
                gas_used: 21_000,
            })
        }))
    }
}

/// Contract handles bound to one sender.
///
/// Every transaction is first handed to the sender, the way the RPC
/// handles do, and only applied to the ledger once the sender accepted it.
pub struct FakeBinding {
    ledger: Arc<Ledger>,
    sender: Address,
    signer: Arc<dyn TransactionSender>,
}

impl FakeBinding {
    async fn submit(
        &self,
        to: Address,
        method: &'static str,
        apply: impl FnOnce(&mut LedgerState) -> Result<(), String> + Send,
    ) -> Result<PendingTx, ChainError> {
        let tx = TransactionRequest::default().from(self.sender).to(to);
        self.signer.send_transaction(tx).await?;
        self.ledger.submit(method, apply)
    }
}

#[async_trait]
impl DepositToken for FakeBinding {
    fn address(&self) -> Address {
        DETH
    }

    async fn deposit(&self, value: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(DETH, "deposit", |s| {
            let balance = LedgerState::balance(&s.eth, sender);
            if balance < value {
                return Err("insufficient funds for transfer".to_string());
            }
            s.eth.insert(sender, balance - value);
            *s.deth.entry(sender).or_default() += value;
            s.contract_eth += value;
            Ok(())
        })
        .await
    }

    async fn withdraw(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(DETH, "withdraw", |s| {
            let balance = LedgerState::balance(&s.deth, sender);
            if balance < amount {
                return Err("Insufficient dETH balance".to_string());
            }
            s.deth.insert(sender, balance - amount);
            *s.eth.entry(sender).or_default() += amount;
            s.contract_eth -= amount;
            Ok(())
        })
        .await
    }

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.ledger
            .read(|s| Ok(LedgerState::balance(&s.deth, account)))
    }

    async fn total_supply(&self) -> Result<U256, ChainError> {
        self.ledger
            .read(|s| Ok(s.deth.values().fold(U256::ZERO, |acc, v| acc + *v)))
    }

    async fn contract_eth_balance(&self) -> Result<U256, ChainError> {
        self.ledger.read(|s| Ok(s.contract_eth))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256, ChainError> {
        self.ledger
            .read(|s| Ok(s.allowances.get(&(owner, spender)).copied().unwrap_or_default()))
    }

    async fn approve(&self, spender: Address, amount: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(DETH, "approve", |s| {
            s.allowances.insert((sender, spender), amount);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StakeToken for FakeBinding {
    fn address(&self) -> Address {
        SETH
    }

    async fn stake(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(SETH, "stake", |s| {
            if amount.is_zero() {
                return Err("Amount must be greater than 0".to_string());
            }
            let allowance = s.allowances.get(&(sender, SETH)).copied().unwrap_or_default();
            if allowance < amount {
                return Err("ERC20: insufficient allowance".to_string());
            }
            let balance = LedgerState::balance(&s.deth, sender);
            if balance < amount {
                return Err("ERC20: transfer amount exceeds balance".to_string());
            }
            if allowance != U256::MAX {
                s.allowances.insert((sender, SETH), allowance - amount);
            }
            s.deth.insert(sender, balance - amount);
            *s.seth.entry(sender).or_default() += amount;
            let block = U256::from(s.block);
            match s.stakers.iter().position(|(a, _, _)| *a == sender) {
                Some(i) => s.stakers[i].1 += amount,
                None => s.stakers.push((sender, amount, block)),
            }
            Ok(())
        })
        .await
    }

    async fn unstake(&self, amount: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(SETH, "unstake", |s| {
            let balance = LedgerState::balance(&s.seth, sender);
            if amount.is_zero() || balance < amount {
                return Err("Insufficient staked amount".to_string());
            }
            s.seth.insert(sender, balance - amount);
            *s.deth.entry(sender).or_default() += amount;
            if let Some(entry) = s.stakers.iter_mut().find(|(a, _, _)| *a == sender) {
                entry.1 -= amount;
            }
            s.stakers.retain(|(_, staked, _)| !staked.is_zero());
            Ok(())
        })
        .await
    }

    async fn balance_of(&self, account: Address) -> Result<U256, ChainError> {
        self.ledger
            .read(|s| Ok(LedgerState::balance(&s.seth, account)))
    }

    async fn deth_token(&self) -> Result<Address, ChainError> {
        Ok(DETH)
    }

    async fn total_staked(&self) -> Result<U256, ChainError> {
        self.ledger.read(|s| Ok(s.total_staked()))
    }

    async fn total_stakers(&self) -> Result<U256, ChainError> {
        self.ledger.read(|s| Ok(U256::from(s.stakers.len())))
    }

    async fn stake_info(&self, user: Address) -> Result<StakeInfo, ChainError> {
        self.ledger.read(|s| {
            Ok(s.stakers
                .iter()
                .find(|(a, _, _)| *a == user)
                .map(|(_, amount, timestamp)| StakeInfo {
                    amount: *amount,
                    timestamp: *timestamp,
                    rank: s.rank_of(user),
                })
                .unwrap_or_default())
        })
    }

    async fn all_stakers(&self) -> Result<Vec<Address>, ChainError> {
        self.ledger
            .read(|s| Ok(s.stakers.iter().map(|(a, _, _)| *a).collect()))
    }

    async fn top_stakers(&self, count: U256) -> Result<TopStakers, ChainError> {
        self.ledger.read(|s| {
            let count = to_index(count);
            let top: Vec<_> = s.ranked().into_iter().take(count).collect();
            Ok(TopStakers {
                addresses: top.iter().map(|(a, _, _)| *a).collect(),
                amounts: top.iter().map(|(_, amount, _)| *amount).collect(),
            })
        })
    }

    async fn paginated_stakers(
        &self,
        offset: U256,
        limit: U256,
    ) -> Result<StakerPage, ChainError> {
        self.ledger.read(|s| {
            let offset = to_index(offset);
            let limit = to_index(limit);
            let page: Vec<_> = s.stakers.iter().skip(offset).take(limit).collect();
            Ok(StakerPage {
                addresses: page.iter().map(|(a, _, _)| *a).collect(),
                amounts: page.iter().map(|(_, amount, _)| *amount).collect(),
                timestamps: page.iter().map(|(_, _, ts)| *ts).collect(),
                ranks: page.iter().map(|(a, _, _)| s.rank_of(*a)).collect(),
            })
        })
    }

    async fn update_leaderboard(&self) -> Result<PendingTx, ChainError> {
        self.submit(SETH, "updateLeaderboard", |_| Ok(())).await
    }
}

#[async_trait]
impl GovernanceModule for FakeBinding {
    fn address(&self) -> Address {
        GOVERNANCE
    }

    async fn proposal_count(&self) -> Result<U256, ChainError> {
        self.ledger.read(|s| Ok(U256::from(s.proposals.len())))
    }

    async fn params(&self) -> Result<GovernanceParams, ChainError> {
        self.ledger.read(|s| Ok(s.params))
    }

    async fn create_proposal(
        &self,
        description: String,
        _target: Address,
        _call_data: Bytes,
    ) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(GOVERNANCE, "createProposal", |s| {
            if LedgerState::balance(&s.seth, sender) < eth(1) {
                return Err("Insufficient sETH to create proposal".to_string());
            }
            let created_at = U256::from(s.block);
            s.proposals.push(ProposalDetails {
                proposer: sender,
                description,
                created_at,
                votes_for: U256::ZERO,
                votes_against: U256::ZERO,
                executed: false,
                canceled: false,
                state: ProposalState::Active,
            });
            Ok(())
        })
        .await
    }

    async fn cast_vote(&self, proposal_id: U256, support: bool) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(GOVERNANCE, "castVote", |s| {
            let index = s.proposal_index(proposal_id)?;
            if s.proposals[index].state != ProposalState::Active {
                return Err("Proposal not active".to_string());
            }
            if s.votes.contains_key(&(index, sender)) {
                return Err("Already voted".to_string());
            }
            let weight = LedgerState::balance(&s.seth, sender);
            if weight.is_zero() {
                return Err("No voting power".to_string());
            }
            let proposal = &mut s.proposals[index];
            if support {
                proposal.votes_for += weight;
            } else {
                proposal.votes_against += weight;
            }
            let choice = if support {
                VoteChoice::For
            } else {
                VoteChoice::Against
            };
            s.votes.insert((index, sender), choice);
            Ok(())
        })
        .await
    }

    async fn execute_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError> {
        self.submit(GOVERNANCE, "executeProposal", |s| {
            let index = s.proposal_index(proposal_id)?;
            let proposal = &mut s.proposals[index];
            if proposal.state != ProposalState::Succeeded {
                return Err("Proposal cannot be executed".to_string());
            }
            proposal.state = ProposalState::Executed;
            proposal.executed = true;
            Ok(())
        })
        .await
    }

    async fn cancel_proposal(&self, proposal_id: U256) -> Result<PendingTx, ChainError> {
        let sender = self.sender;
        self.submit(GOVERNANCE, "cancelProposal", |s| {
            let index = s.proposal_index(proposal_id)?;
            let proposal = &mut s.proposals[index];
            if proposal.proposer != sender || proposal.state != ProposalState::Active {
                return Err("Only proposer can cancel".to_string());
            }
            proposal.state = ProposalState::Canceled;
            proposal.canceled = true;
            Ok(())
        })
        .await
    }

    async fn proposal_state(&self, proposal_id: U256) -> Result<ProposalState, ChainError> {
        self.ledger.read(|s| {
            let index = s.proposal_index(proposal_id)?;
            Ok(s.proposals[index].state)
        })
    }

    async fn proposal_details(&self, proposal_id: U256) -> Result<ProposalDetails, ChainError> {
        self.ledger.read(|s| {
            let index = s.proposal_index(proposal_id)?;
            Ok(s.proposals[index].clone())
        })
    }

    async fn proposal_votes(&self, proposal_id: U256) -> Result<VoteTally, ChainError> {
        self.ledger.read(|s| {
            let index = s.proposal_index(proposal_id)?;
            let proposal = &s.proposals[index];
            Ok(VoteTally {
                votes_for: proposal.votes_for,
                votes_against: proposal.votes_against,
            })
        })
    }

    async fn vote_of(&self, proposal_id: U256, voter: Address) -> Result<VoteChoice, ChainError> {
        self.ledger.read(|s| {
            let index = s.proposal_index(proposal_id)?;
            Ok(s.votes
                .get(&(index, voter))
                .copied()
                .unwrap_or(VoteChoice::None))
        })
    }

    async fn update_params(&self, params: GovernanceParams) -> Result<PendingTx, ChainError> {
        self.submit(GOVERNANCE, "updateGovernanceParams", |s| {
            s.params = params;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl StakingDashboard for FakeBinding {
    fn address(&self) -> Address {
        DASHBOARD
    }

    async fn seth_token(&self) -> Result<Address, ChainError> {
        Ok(SETH)
    }

    async fn deth_token(&self) -> Result<Address, ChainError> {
        Ok(DETH)
    }

    async fn staking_overview(&self) -> Result<StakingOverview, ChainError> {
        self.ledger.read(|s| {
            let total_staked = s.total_staked();
            let total_stakers = U256::from(s.stakers.len());
            let average_stake = if total_stakers.is_zero() {
                U256::ZERO
            } else {
                total_staked / total_stakers
            };
            Ok(StakingOverview {
                total_eth_deposited: s.contract_eth,
                total_eth_staked: total_staked,
                total_stakers,
                average_stake,
            })
        })
    }

    async fn leaderboard(&self, count: U256) -> Result<Leaderboard, ChainError> {
        self.ledger.read(|s| {
            let count = to_index(count);
            let top: Vec<_> = s.ranked().into_iter().take(count).collect();
            Ok(Leaderboard {
                addresses: top.iter().map(|(a, _, _)| *a).collect(),
                amounts: top.iter().map(|(_, amount, _)| *amount).collect(),
                percentages_bps: top.iter().map(|(_, amount, _)| s.share_bps(*amount)).collect(),
            })
        })
    }

    async fn staker_details(&self, staker: Address) -> Result<StakerDetails, ChainError> {
        self.ledger.read(|s| {
            Ok(s.stakers
                .iter()
                .find(|(a, _, _)| *a == staker)
                .map(|(_, amount, timestamp)| StakerDetails {
                    amount: *amount,
                    timestamp: *timestamp,
                    rank: s.rank_of(staker),
                    percentage_bps: s.share_bps(*amount),
                })
                .unwrap_or_default())
        })
    }

    async fn staking_activity(&self, _days_ago: U256) -> Result<StakingActivity, ChainError> {
        self.ledger.read(|s| {
            Ok(StakingActivity {
                active_stakers: U256::from(s.stakers.len()),
                recent_stakers: s.stakers.iter().map(|(a, _, _)| *a).collect(),
            })
        })
    }

    async fn paginated_stakers(
        &self,
        offset: U256,
        limit: U256,
    ) -> Result<DetailedStakerPage, ChainError> {
        self.ledger.read(|s| {
            let offset = to_index(offset);
            let limit = to_index(limit);
            let page: Vec<_> = s.stakers.iter().skip(offset).take(limit).collect();
            Ok(DetailedStakerPage {
                addresses: page.iter().map(|(a, _, _)| *a).collect(),
                amounts: page.iter().map(|(_, amount, _)| *amount).collect(),
                timestamps: page.iter().map(|(_, _, ts)| *ts).collect(),
                ranks: page.iter().map(|(a, _, _)| s.rank_of(*a)).collect(),
                percentages_bps: page.iter().map(|(_, amount, _)| s.share_bps(*amount)).collect(),
            })
        })
    }
}

/// [`ChainAccess`] over a [`Ledger`].
pub struct FakeChain {
    pub ledger: Arc<Ledger>,
}

impl FakeChain {
    pub fn new(ledger: &Arc<Ledger>) -> Arc<Self> {
        Arc::new(Self {
            ledger: Arc::clone(ledger),
        })
    }
}

#[async_trait]
impl ChainAccess for FakeChain {
    async fn native_balance(&self, account: Address) -> Result<U256, ChainError> {
        self.ledger
            .read(|s| Ok(LedgerState::balance(&s.eth, account)))
    }

    async fn block_number(&self) -> Result<u64, ChainError> {
        self.ledger.read(|s| Ok(s.block))
    }

    fn bind_contracts(&self, sender: Arc<dyn TransactionSender>) -> Contracts {
        self.ledger.bind(sender)
    }
}

/// Stand-in for the server key: accepts every transaction.
pub struct FakeKey(pub Address);

#[async_trait]
impl TransactionSender for FakeKey {
    fn account(&self) -> Address {
        self.0
    }

    async fn send_transaction(&self, _tx: TransactionRequest) -> Result<TxHash, ChainError> {
        Ok(TxHash::ZERO)
    }
}

/// Gateway state whose server signer is [`ALICE`].
pub fn app_state(ledger: &Arc<Ledger>) -> AppState {
    AppState::new(FakeChain::new(ledger), Arc::new(FakeKey(ALICE)))
}

/// Scriptable injected wallet.
pub struct FakeWallet {
    pub accounts: Mutex<Vec<Address>>,
    /// Whether `eth_accounts` exposes the accounts without prompting.
    pub authorized: Mutex<bool>,
    pub chain_id: Mutex<u64>,
    pub known_chains: Mutex<HashSet<u64>>,
    pub reject_requests: Mutex<bool>,
    pub calls: Mutex<Vec<&'static str>>,
    /// Requests received through `eth_sendTransaction`.
    pub sent: Mutex<Vec<TransactionRequest>>,
}

impl FakeWallet {
    pub fn new(accounts: Vec<Address>, chain_id: u64) -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(accounts),
            authorized: Mutex::new(false),
            chain_id: Mutex::new(chain_id),
            known_chains: Mutex::new(HashSet::from([1, chain_id])),
            reject_requests: Mutex::new(false),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) -> Result<(), WalletError> {
        self.calls.lock().unwrap().push(call);
        if *self.reject_requests.lock().unwrap() {
            return Err(WalletError::UserRejected);
        }
        Ok(())
    }
}

#[async_trait]
impl InjectedWallet for FakeWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        self.record("eth_requestAccounts")?;
        *self.authorized.lock().unwrap() = true;
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn accounts(&self) -> Result<Vec<Address>, WalletError> {
        if *self.authorized.lock().unwrap() {
            Ok(self.accounts.lock().unwrap().clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn chain_id(&self) -> Result<u64, WalletError> {
        Ok(*self.chain_id.lock().unwrap())
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), WalletError> {
        self.record("wallet_switchEthereumChain")?;
        if !self.known_chains.lock().unwrap().contains(&chain_id) {
            return Err(WalletError::UnknownChain);
        }
        *self.chain_id.lock().unwrap() = chain_id;
        Ok(())
    }

    async fn add_chain(&self, params: &AddChainParams) -> Result<(), WalletError> {
        self.record("wallet_addEthereumChain")?;
        self.known_chains.lock().unwrap().insert(params.chain_id);
        *self.chain_id.lock().unwrap() = params.chain_id;
        Ok(())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, WalletError> {
        self.record("eth_sendTransaction")?;
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(TxHash::from(U256::from(sent.len())))
    }
}

/// Collects notifications for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
