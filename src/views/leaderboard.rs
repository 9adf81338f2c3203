// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Top stakers by amount.

use std::sync::{Arc, Mutex};

use alloy::primitives::{Address, U256};
use tracing::warn;

use super::action::{Action, ActionState};
use super::format::{format_percent_bps, format_token, short_address};
use super::{confirmed, connected, surface, ViewError};
use crate::blockchain::{StakingOverview, TxReceipt};
use crate::session::SessionManager;

/// Number of stakers shown.
pub const LEADERBOARD_SIZE: u64 = 10;

/// A mirrored leaderboard entry. Rank is the 1-based list position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub address: Address,
    pub staked: U256,
    pub percentage_bps: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trophy {
    Gold,
    Silver,
    Bronze,
}

impl Trophy {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Trophy::Gold),
            2 => Some(Trophy::Silver),
            3 => Some(Trophy::Bronze),
            _ => None,
        }
    }
}

/// Display-ready leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub address: Address,
    pub short_address: String,
    pub staked: String,
    pub share: String,
    pub is_you: bool,
    pub trophy: Option<Trophy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardData {
    pub loading: bool,
    pub overview: Option<StakingOverview>,
    pub entries: Vec<LeaderboardEntry>,
}

impl Default for LeaderboardData {
    fn default() -> Self {
        Self {
            loading: true,
            overview: None,
            entries: Vec::new(),
        }
    }
}

pub struct LeaderboardView {
    session: Arc<SessionManager>,
    data: Mutex<LeaderboardData>,
    update: Action,
}

impl LeaderboardView {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            data: Mutex::new(LeaderboardData::default()),
            update: Action::new(),
        }
    }

    pub fn data(&self) -> LeaderboardData {
        self.lock().clone()
    }

    pub fn update_state(&self) -> ActionState {
        self.update.state(&())
    }

    /// Fetch the overview and the top stakers. The entry list is replaced
    /// wholesale.
    pub async fn load(&self) -> Result<(), ViewError> {
        let result = self.fetch().await;
        let mut data = self.lock();
        data.loading = false;
        match result {
            Ok((overview, entries)) => {
                data.overview = Some(overview);
                data.entries = entries;
                Ok(())
            }
            Err(e) => {
                drop(data);
                warn!(error = %e, "Leaderboard load failed");
                surface(&self.session, "Loading Leaderboard", Err(e))
            }
        }
    }

    async fn fetch(&self) -> Result<(StakingOverview, Vec<LeaderboardEntry>), ViewError> {
        let session = connected(&self.session)?;
        let dashboard = &session.contracts.dashboard;
        let (overview, board) = tokio::try_join!(
            dashboard.staking_overview(),
            dashboard.leaderboard(U256::from(LEADERBOARD_SIZE)),
        )?;

        let entries = board
            .addresses
            .into_iter()
            .zip(board.amounts)
            .zip(board.percentages_bps)
            .map(|((address, staked), percentage_bps)| LeaderboardEntry {
                address,
                staked,
                percentage_bps,
            })
            .collect();
        Ok((overview, entries))
    }

    /// Entries formatted for display, marking the connected account.
    pub fn rows(&self) -> Vec<LeaderboardRow> {
        let account = self.session.session().map(|s| s.account);
        self.lock()
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let rank = i + 1;
                LeaderboardRow {
                    rank,
                    address: entry.address,
                    short_address: short_address(&entry.address),
                    staked: format_token(entry.staked),
                    share: format_percent_bps(entry.percentage_bps),
                    is_you: Some(entry.address) == account,
                    trophy: Trophy::for_rank(rank),
                }
            })
            .collect()
    }

    /// Ask the sETH contract to recompute its ranking, then re-fetch.
    pub async fn update_leaderboard(&self) -> Result<TxReceipt, ViewError> {
        let result = self.try_update().await;
        surface(&self.session, "Leaderboard Update", result)
    }

    async fn try_update(&self) -> Result<TxReceipt, ViewError> {
        let session = connected(&self.session)?;
        let receipt = self
            .update
            .run((), || session.contracts.seth.update_leaderboard())
            .await?;
        confirmed(&self.session, "Leaderboard Update", &receipt).await;
        // A failed reload is reported by `load`; the transaction still stands.
        self.load().await.ok();
        Ok(receipt)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LeaderboardData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
