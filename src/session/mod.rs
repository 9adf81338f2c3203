// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Session
//!
//! [`SessionManager`] owns the connection to an injected wallet, the active
//! account and chain, and the four contract handles bound to that account.
//! Views receive it behind an `Arc` and read the current [`Session`] and
//! [`BalanceSnapshot`] from it; both are published on `watch` channels so
//! UI layers can react to changes.
//!
//! ## Lifecycle
//!
//! - `connect()` requests accounts, moves the wallet to the target chain
//!   (adding it when the wallet reports it unknown), binds the contracts so
//!   that transactions are sent by the wallet (`eth_sendTransaction`) and
//!   takes a first balance snapshot. Any failure leaves the state untouched.
//! - Wallet events rebuild or tear down the session.
//! - A background loop refreshes balances every 15 s while connected.
//!
//! Refreshes from different sources are not serialized; they are idempotent
//! reads and the last one to finish wins.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::blockchain::{BalanceSnapshot, ChainAccess, Contracts, NetworkConfig};
use crate::notify::{Notification, Notifier};

pub mod wallet;

pub use wallet::{
    AddChainParams, InjectedWallet, NativeCurrency, WalletError, WalletEvent, WalletSender,
    UNKNOWN_CHAIN_CODE, USER_REJECTED_CODE,
};

/// Interval between background balance refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// An established wallet connection. Exists only while connected.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Address,
    pub chain_id: u64,
    /// Handles whose transactions the wallet sends from `account`.
    pub contracts: Contracts,
}

/// Owner of the wallet connection and the account's balance snapshot.
pub struct SessionManager {
    wallet: Option<Arc<dyn InjectedWallet>>,
    chain: Arc<dyn ChainAccess>,
    network: NetworkConfig,
    notifier: Arc<dyn Notifier>,
    refresh_interval: Duration,
    session: watch::Sender<Option<Session>>,
    balances: watch::Sender<BalanceSnapshot>,
}

impl SessionManager {
    /// `wallet` is `None` when no injected wallet is present.
    pub fn new(
        wallet: Option<Arc<dyn InjectedWallet>>,
        chain: Arc<dyn ChainAccess>,
        network: NetworkConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            wallet,
            chain,
            network,
            notifier,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            session: watch::Sender::new(None),
            balances: watch::Sender::new(BalanceSnapshot::default()),
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Current session, if connected.
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Latest balance snapshot. Zero while disconnected.
    pub fn balances(&self) -> BalanceSnapshot {
        *self.balances.borrow()
    }

    /// Subscribe to session changes.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    /// Subscribe to balance snapshots.
    pub fn watch_balances(&self) -> watch::Receiver<BalanceSnapshot> {
        self.balances.subscribe()
    }

    /// Connect to the injected wallet on the target network.
    ///
    /// Failures are reported to the notifier and leave any existing state
    /// unchanged.
    pub async fn connect(&self) -> Result<Session, WalletError> {
        match self.try_connect().await {
            Ok(session) => {
                info!(account = %session.account, chain_id = session.chain_id, "Wallet connected");
                self.notifier.notify(Notification::info(
                    "Wallet Connected",
                    format!("Connected to {}", session.account),
                ));
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                self.notifier
                    .notify(Notification::error("Connection Failed", e.to_string()));
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<Session, WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::NotInstalled)?;

        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or(WalletError::NoAccounts)?;

        self.ensure_network(wallet.as_ref()).await?;

        let session = self.open(account)?;
        self.session.send_replace(Some(session.clone()));
        self.refresh().await;
        Ok(session)
    }

    async fn ensure_network(&self, wallet: &dyn InjectedWallet) -> Result<(), WalletError> {
        let current = wallet.chain_id().await?;
        if current == self.network.chain_id {
            return Ok(());
        }

        debug!(from = current, to = self.network.chain_id, "Requesting network switch");
        match wallet.switch_chain(self.network.chain_id).await {
            Ok(()) => Ok(()),
            Err(WalletError::UnknownChain) => {
                info!(chain_id = self.network.chain_id, "Adding network to wallet");
                wallet.add_chain(&AddChainParams::from(&self.network)).await
            }
            Err(e) => Err(e),
        }
    }

    fn open(&self, account: Address) -> Result<Session, WalletError> {
        let wallet = self.wallet.as_ref().ok_or(WalletError::NotInstalled)?;
        let sender = WalletSender::new(Arc::clone(wallet), account);
        let contracts = self.chain.bind_contracts(Arc::new(sender));
        Ok(Session {
            account,
            chain_id: self.network.chain_id,
            contracts,
        })
    }

    /// Drop the session and its handles. Wallet permissions are left as is.
    pub fn disconnect(&self) {
        if self.teardown() {
            info!("Wallet disconnected");
            self.notifier.notify(Notification::info(
                "Wallet Disconnected",
                "Your wallet has been disconnected",
            ));
        }
    }

    fn teardown(&self) -> bool {
        let previous = self.session.send_replace(None);
        self.balances.send_replace(BalanceSnapshot::default());
        previous.is_some()
    }

    /// Re-read ETH, dETH and sETH balances of the current account.
    ///
    /// Errors are logged; the previous snapshot is kept.
    pub async fn refresh(&self) {
        let Some(session) = self.session() else {
            return;
        };
        let account = session.account;

        let result = tokio::try_join!(
            self.chain.native_balance(account),
            session.contracts.deth.balance_of(account),
            session.contracts.seth.balance_of(account),
        );

        match result {
            Ok((eth, deth, seth)) => {
                let still_current =
                    self.session.borrow().as_ref().map(|s| s.account) == Some(account);
                if still_current {
                    self.balances
                        .send_replace(BalanceSnapshot { eth, deth, seth });
                }
            }
            Err(e) => warn!(account = %account, error = %e, "Balance refresh failed"),
        }
    }

    /// React to a wallet notification.
    pub async fn handle_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged(accounts) => match accounts.first() {
                None => self.disconnect(),
                Some(&account) => {
                    let current = self.session.borrow().as_ref().map(|s| s.account);
                    match current {
                        Some(current) if current != account => self.switch_account(account).await,
                        _ => {}
                    }
                }
            },
            WalletEvent::ChainChanged(chain_id) => {
                if chain_id == self.network.chain_id {
                    self.refresh().await;
                } else if self.teardown() {
                    warn!(chain_id, expected = self.network.chain_id, "Wallet switched to another network");
                    self.notifier.notify(Notification::error(
                        "Wrong Network",
                        format!("Please switch to {}", self.network.name),
                    ));
                }
            }
        }
    }

    async fn switch_account(&self, account: Address) {
        match self.open(account) {
            Ok(session) => {
                info!(account = %account, "Active account changed");
                self.balances.send_replace(BalanceSnapshot::default());
                self.session.send_replace(Some(session));
                self.refresh().await;
            }
            Err(e) => {
                warn!(account = %account, error = %e, "Could not open session for account");
                self.teardown();
                self.notifier
                    .notify(Notification::error("Connection Failed", e.to_string()));
            }
        }
    }

    /// Connect without prompting if the wallet already exposes an authorized
    /// account.
    pub async fn auto_connect(&self) -> Option<Session> {
        let wallet = self.wallet.as_ref()?;
        match wallet.accounts().await {
            Ok(accounts) if !accounts.is_empty() => self.connect().await.ok(),
            Ok(_) => None,
            Err(e) => {
                debug!(error = %e, "Could not query authorized accounts");
                None
            }
        }
    }

    /// Refresh balances every `refresh_interval` while connected, until
    /// `shutdown` is cancelled.
    pub fn spawn_refresh_loop(self: &Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.run_refresh_loop(shutdown).await })
    }

    async fn run_refresh_loop(&self, shutdown: CancellationToken) {
        debug!(
            interval_secs = self.refresh_interval.as_secs(),
            "Balance refresh loop starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.refresh_interval) => {},
                _ = shutdown.cancelled() => {
                    debug!("Balance refresh loop shutting down");
                    return;
                }
            }

            if self.is_connected() {
                self.refresh().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{
        create_signer, ChainClient, ChainError, HOLESKY_CHAIN_ID, HOLESKY_CONTRACTS,
    };
    use alloy::primitives::U256;
    use crate::testing::{eth, FakeChain, FakeWallet, Ledger, RecordingNotifier, ALICE, BOB};

    fn setup(
        wallet: Option<Arc<FakeWallet>>,
        ledger: &Arc<Ledger>,
    ) -> (Arc<SessionManager>, Arc<RecordingNotifier>) {
        let notifier = RecordingNotifier::new();
        let wallet = wallet.map(|w| w as Arc<dyn InjectedWallet>);
        let manager = SessionManager::new(
            wallet,
            FakeChain::new(ledger),
            NetworkConfig::holesky(),
            notifier.clone(),
        );
        (Arc::new(manager), notifier)
    }

    #[tokio::test]
    async fn connect_binds_contracts_and_snapshots_balances() {
        let ledger = Ledger::new();
        ledger.fund(ALICE, eth(3));
        ledger.set_deth(ALICE, eth(2));
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, notifier) = setup(Some(wallet.clone()), &ledger);

        let session = manager.connect().await.unwrap();
        assert_eq!(session.account, ALICE);
        assert_eq!(session.chain_id, HOLESKY_CHAIN_ID);
        assert!(manager.is_connected());
        assert_eq!(
            manager.balances(),
            BalanceSnapshot {
                eth: eth(3),
                deth: eth(2),
                seth: U256::ZERO,
            }
        );
        assert_eq!(wallet.calls(), vec!["eth_requestAccounts"]);
        assert_eq!(notifier.titles(), vec!["Wallet Connected"]);
    }

    #[tokio::test]
    async fn connect_switches_then_adds_unknown_chain() {
        let ledger = Ledger::new();
        let wallet = FakeWallet::new(vec![ALICE], 1);
        wallet.known_chains.lock().unwrap().remove(&HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet.clone()), &ledger);

        manager.connect().await.unwrap();
        assert_eq!(
            wallet.calls(),
            vec![
                "eth_requestAccounts",
                "wallet_switchEthereumChain",
                "wallet_addEthereumChain"
            ]
        );
        assert_eq!(*wallet.chain_id.lock().unwrap(), HOLESKY_CHAIN_ID);
    }

    #[tokio::test]
    async fn connect_without_wallet_fails_without_state_change() {
        let ledger = Ledger::new();
        let (manager, notifier) = setup(None, &ledger);

        assert_eq!(manager.connect().await.unwrap_err(), WalletError::NotInstalled);
        assert!(manager.session().is_none());
        assert_eq!(notifier.titles(), vec!["Connection Failed"]);
    }

    #[tokio::test]
    async fn rejected_or_empty_accounts_leave_session_unset() {
        let ledger = Ledger::new();
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        *wallet.reject_requests.lock().unwrap() = true;
        let (manager, _) = setup(Some(wallet), &ledger);
        assert_eq!(manager.connect().await.unwrap_err(), WalletError::UserRejected);
        assert!(!manager.is_connected());

        let wallet = FakeWallet::new(Vec::new(), HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet), &ledger);
        assert_eq!(manager.connect().await.unwrap_err(), WalletError::NoAccounts);
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn disconnect_clears_session_and_balances() {
        let ledger = Ledger::new();
        ledger.fund(ALICE, eth(1));
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet), &ledger);
        manager.connect().await.unwrap();

        let mut rx = manager.watch();
        manager.disconnect();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(manager.session().is_none());
        assert_eq!(manager.balances(), BalanceSnapshot::default());
    }

    #[tokio::test]
    async fn refresh_failure_keeps_previous_snapshot() {
        let ledger = Ledger::new();
        ledger.fund(ALICE, eth(5));
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet), &ledger);
        manager.connect().await.unwrap();

        ledger.fail_reads(true);
        ledger.fund(ALICE, eth(1));
        manager.refresh().await;
        assert_eq!(manager.balances().eth, eth(5));

        ledger.fail_reads(false);
        manager.refresh().await;
        assert_eq!(manager.balances().eth, eth(6));
    }

    #[tokio::test]
    async fn account_change_rebinds_and_empty_list_disconnects() {
        let ledger = Ledger::new();
        ledger.fund(BOB, eth(7));
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet), &ledger);
        manager.connect().await.unwrap();

        manager
            .handle_event(WalletEvent::AccountsChanged(vec![BOB, ALICE]))
            .await;
        let session = manager.session().unwrap();
        assert_eq!(session.account, BOB);
        assert_eq!(manager.balances().eth, eth(7));

        manager
            .handle_event(WalletEvent::AccountsChanged(Vec::new()))
            .await;
        assert!(manager.session().is_none());
    }

    #[tokio::test]
    async fn wrong_chain_tears_down_with_notification() {
        let ledger = Ledger::new();
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, notifier) = setup(Some(wallet), &ledger);
        manager.connect().await.unwrap();

        manager.handle_event(WalletEvent::ChainChanged(1)).await;
        assert!(manager.session().is_none());
        assert_eq!(notifier.titles().last().unwrap(), "Wrong Network");
    }

    #[tokio::test]
    async fn auto_connect_only_with_authorized_accounts() {
        let ledger = Ledger::new();
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet.clone()), &ledger);

        assert!(manager.auto_connect().await.is_none());
        assert!(wallet.calls().is_empty());

        *wallet.authorized.lock().unwrap() = true;
        let session = manager.auto_connect().await.unwrap();
        assert_eq!(session.account, ALICE);
    }

    #[tokio::test]
    async fn refresh_loop_picks_up_new_balances_and_stops() {
        let ledger = Ledger::new();
        let wallet = FakeWallet::new(vec![ALICE], HOLESKY_CHAIN_ID);
        let notifier = RecordingNotifier::new();
        let manager = Arc::new(
            SessionManager::new(
                Some(wallet as Arc<dyn InjectedWallet>),
                FakeChain::new(&ledger),
                NetworkConfig::holesky(),
                notifier,
            )
            .with_refresh_interval(Duration::from_millis(10)),
        );
        manager.connect().await.unwrap();

        let mut balances = manager.watch_balances();
        balances.mark_unchanged();
        ledger.fund(ALICE, eth(2));

        let shutdown = CancellationToken::new();
        let handle = manager.spawn_refresh_loop(shutdown.clone());

        tokio::time::timeout(Duration::from_secs(5), balances.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(manager.balances().eth, eth(2));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn wallet_account_gets_handles_from_the_rpc_client() {
        // Nothing listens here; balance reads fail and are only logged.
        let mut network = NetworkConfig::holesky();
        network.rpc_url = "http://127.0.0.1:1".to_string();
        let server_key = create_signer(
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        )
        .unwrap();
        let chain = ChainClient::new(network.clone(), HOLESKY_CONTRACTS)
            .unwrap()
            .with_signer(server_key)
            .unwrap();
        assert_ne!(chain.signer_address(), Some(BOB));

        let wallet = FakeWallet::new(vec![BOB], HOLESKY_CHAIN_ID);
        let manager = SessionManager::new(
            Some(wallet.clone() as Arc<dyn InjectedWallet>),
            Arc::new(chain),
            network,
            RecordingNotifier::new(),
        );

        let session = manager.connect().await.unwrap();
        assert_eq!(session.account, BOB);

        let pending = session.contracts.deth.deposit(eth(1)).await.unwrap();
        assert_eq!(pending.tx_hash(), alloy::primitives::TxHash::from(U256::from(1u64)));
        assert_eq!(
            wallet.calls(),
            vec!["eth_requestAccounts", "eth_sendTransaction"]
        );

        let sent = wallet.sent.lock().unwrap();
        assert_eq!(sent[0].from, Some(BOB));
        assert_eq!(sent[0].value, Some(eth(1)));
        assert_eq!(
            sent[0].to.and_then(|to| to.to().copied()),
            Some(HOLESKY_CONTRACTS.deth)
        );
    }

    #[tokio::test]
    async fn rejected_send_leaves_the_chain_untouched() {
        let ledger = Ledger::new();
        ledger.fund(BOB, eth(2));
        let wallet = FakeWallet::new(vec![BOB], HOLESKY_CHAIN_ID);
        let (manager, _) = setup(Some(wallet.clone()), &ledger);
        let session = manager.connect().await.unwrap();

        *wallet.reject_requests.lock().unwrap() = true;
        let err = session.contracts.deth.deposit(eth(1)).await.unwrap_err();
        assert_eq!(
            err,
            ChainError::TransactionFailed("Request rejected by user".to_string())
        );
        assert!(ledger.submitted().is_empty());
        assert_eq!(ledger.deth_of(BOB), U256::ZERO);

        *wallet.reject_requests.lock().unwrap() = false;
        session.contracts.deth.deposit(eth(1)).await.unwrap();
        assert_eq!(ledger.deth_of(BOB), eth(1));
        assert_eq!(wallet.sent.lock().unwrap()[0].from, Some(BOB));
    }
}
