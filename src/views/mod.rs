// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Feature Views
//!
//! View-models for the dashboard, deposit, stake, leaderboard and governance
//! screens. Rendering is left to the embedding UI.
//!
//! Every view reads contract state on [`load`](dashboard::DashboardView::load)
//! and keeps a `loading` flag until the first read settles. User actions
//! validate locally, submit one transaction through an [`ActionSet`], wait
//! for inclusion and re-read. Failures are reported through the session's
//! notifier and leave previously loaded values in place.

use alloy::primitives::U256;

use crate::blockchain::{parse_amount, ChainError, TxReceipt};
use crate::notify::Notification;
use crate::session::{Session, SessionManager};

pub mod action;
pub mod dashboard;
pub mod deposit;
pub mod format;
pub mod governance;
pub mod leaderboard;
pub mod stake;

pub use action::{Action, ActionSet, ActionState};
pub use dashboard::{DashboardData, DashboardView};
pub use deposit::DepositView;
pub use governance::{available_actions, GovernanceData, GovernanceView, ProposalAction, ProposalEntry};
pub use leaderboard::{LeaderboardData, LeaderboardEntry, LeaderboardRow, LeaderboardView, Trophy};
pub use stake::{StakeData, StakeView};

/// Token decimals of ETH, dETH and sETH.
pub const TOKEN_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("Please connect your wallet")]
    NotConnected,

    #[error("{0}")]
    Validation(String),

    #[error("A transaction for this action is already pending")]
    InFlight,

    #[error(transparent)]
    Chain(#[from] ChainError),
}

fn connected(manager: &SessionManager) -> Result<Session, ViewError> {
    manager.session().ok_or(ViewError::NotConnected)
}

/// Parse a user-entered token amount that must be greater than zero.
fn parse_positive_amount(input: &str) -> Result<U256, ViewError> {
    if input.trim().is_empty() {
        return Err(ViewError::Validation("Please enter an amount".to_string()));
    }
    let amount = parse_amount(input, TOKEN_DECIMALS)
        .map_err(|_| ViewError::Validation("Please enter a valid amount".to_string()))?;
    if amount.is_zero() {
        return Err(ViewError::Validation(
            "Amount must be greater than 0".to_string(),
        ));
    }
    Ok(amount)
}

/// Report a failed user action. Rejected re-submissions stay silent.
fn surface<T>(
    manager: &SessionManager,
    title: &str,
    result: Result<T, ViewError>,
) -> Result<T, ViewError> {
    if let Err(e) = &result {
        if *e != ViewError::InFlight {
            manager
                .notifier()
                .notify(Notification::error(format!("{title} Failed"), e.to_string()));
        }
    }
    result
}

/// Announce a confirmed transaction and refresh the session balances.
async fn confirmed(manager: &SessionManager, title: &str, receipt: &TxReceipt) {
    manager.notifier().notify(Notification::info(
        format!("{title} Successful"),
        format!(
            "Transaction confirmed: {}",
            manager.network().tx_url(&receipt.hash_hex())
        ),
    ));
    manager.refresh().await;
}
