// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Protocol overview plus the connected account's position.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::format::{format_percent_bps, format_timestamp, format_token};
use super::{connected, surface, ViewError};
use crate::blockchain::{BalanceSnapshot, StakerDetails, StakingOverview};
use crate::session::SessionManager;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub loading: bool,
    pub overview: Option<StakingOverview>,
    pub staker: Option<StakerDetails>,
    pub balances: BalanceSnapshot,
}

impl Default for DashboardData {
    fn default() -> Self {
        Self {
            loading: true,
            overview: None,
            staker: None,
            balances: BalanceSnapshot::default(),
        }
    }
}

pub struct DashboardView {
    session: Arc<SessionManager>,
    data: Mutex<DashboardData>,
}

impl DashboardView {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            data: Mutex::new(DashboardData::default()),
        }
    }

    pub fn data(&self) -> DashboardData {
        self.lock().clone()
    }

    /// Read the overview and the account's staker details.
    pub async fn load(&self) -> Result<(), ViewError> {
        let result = self.fetch().await;
        let mut data = self.lock();
        data.loading = false;
        data.balances = self.session.balances();
        match result {
            Ok((overview, staker)) => {
                data.overview = Some(overview);
                data.staker = Some(staker);
                Ok(())
            }
            Err(e) => {
                drop(data);
                warn!(error = %e, "Dashboard load failed");
                surface(&self.session, "Loading Dashboard", Err(e))
            }
        }
    }

    async fn fetch(&self) -> Result<(StakingOverview, StakerDetails), ViewError> {
        let session = connected(&self.session)?;
        let dashboard = &session.contracts.dashboard;
        let (overview, staker) = tokio::try_join!(
            dashboard.staking_overview(),
            dashboard.staker_details(session.account),
        )?;
        Ok((overview, staker))
    }

    /// Re-read the session balances, then the dashboard data.
    pub async fn refresh(&self) -> Result<(), ViewError> {
        self.session.refresh().await;
        self.load().await
    }

    /// The account's share of total stake, e.g. `"25.50%"`.
    pub fn stake_share(&self) -> Option<String> {
        self.lock()
            .staker
            .map(|staker| format_percent_bps(staker.percentage_bps))
    }

    pub fn staked_amount(&self) -> Option<String> {
        self.lock().staker.map(|staker| format_token(staker.amount))
    }

    pub fn staked_since(&self) -> Option<String> {
        self.lock()
            .staker
            .map(|staker| format_timestamp(staker.timestamp))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DashboardData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
