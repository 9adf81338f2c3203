// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EthVault - Staking & Governance Gateway
//!
//! REST gateway and wallet-session client for the EthVault contracts on
//! Ethereum Holesky: dETH (ETH deposit token), sETH (staked dETH),
//! governance and the staking dashboard.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum) driven by a server-held signer
//! - `blockchain` - Typed contract handles and the Holesky client
//! - `session` - Injected-wallet session lifecycle and balance refresh
//! - `views` - View-models for the dashboard, deposit, stake, leaderboard
//!   and governance screens

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod session;
pub mod state;
pub mod views;

#[cfg(test)]
mod testing;
