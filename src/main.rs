// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::error::Error;
use std::sync::Arc;

use ethvault::{
    api::router,
    blockchain::{signer_from_key, ChainClient, ChainError},
    config::Config,
    logging,
    state::AppState,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; variables may come from the environment.
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    logging::init(config.log_format);
    info!(?config, "configuration loaded");

    let signer = signer_from_key(&config.private_key)?;
    let chain = ChainClient::new(config.network.clone(), config.contracts)?.with_signer(signer)?;
    let sender = chain.key_sender().ok_or(ChainError::NoSigner)?;
    let signer_address = sender.account();

    match chain.chain_id().await {
        Ok(id) if id != config.network.chain_id => warn!(
            expected = config.network.chain_id,
            actual = id,
            "RPC endpoint reports a different chain id"
        ),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "could not read chain id from RPC endpoint"),
    }

    let state = AppState::new(Arc::new(chain), sender);
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        addr = %config.bind_addr,
        signer = %signer_address,
        network = %config.network.name,
        "EthVault gateway listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for Ctrl-C");
            }
            info!("shutdown requested");
            shutdown.cancel();
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("server stopped");
    Ok(())
}
