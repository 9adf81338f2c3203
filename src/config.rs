// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup; a `.env` file in the working directory is honored.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `4000` |
//! | `RPC_URL` | JSON-RPC endpoint | Holesky public RPC |
//! | `PRIVATE_KEY` | Gateway signer, hex (optional `0x`) or PEM | Required |
//! | `CHAIN_ID` | Expected chain id | `17000` |
//! | `DETH_ADDRESS` | dETH contract | Holesky deployment |
//! | `SETH_ADDRESS` | sETH contract | Holesky deployment |
//! | `GOVERNANCE_ADDRESS` | Governance contract | Holesky deployment |
//! | `STAKING_DASHBOARD_ADDRESS` | Dashboard contract | Holesky deployment |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::blockchain::{ContractAddresses, NetworkConfig, HOLESKY_CHAIN_ID, HOLESKY_CONTRACTS};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const RPC_URL_ENV: &str = "RPC_URL";

/// Environment variable holding the gateway signing key.
///
/// Every mutating request is signed with this key. It is never logged.
pub const PRIVATE_KEY_ENV: &str = "PRIVATE_KEY";

pub const CHAIN_ID_ENV: &str = "CHAIN_ID";
pub const DETH_ADDRESS_ENV: &str = "DETH_ADDRESS";
pub const SETH_ADDRESS_ENV: &str = "SETH_ADDRESS";
pub const GOVERNANCE_ADDRESS_ENV: &str = "GOVERNANCE_ADDRESS";
pub const STAKING_DASHBOARD_ADDRESS_ENV: &str = "STAKING_DASHBOARD_ADDRESS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 4000;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Gateway configuration.
#[derive(Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub network: NetworkConfig,
    pub contracts: ContractAddresses,
    /// Raw signing key, hex or PEM.
    pub private_key: String,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_addr", &self.bind_addr)
            .field("network", &self.network)
            .field("contracts", &self.contracts)
            .field("private_key", &"<redacted>")
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host: IpAddr = parse_or(get(HOST_ENV), HOST_ENV, || {
            IpAddr::from_str(DEFAULT_HOST).map_err(|e| e.to_string())
        })?;
        let port: u16 = parse_or(get(PORT_ENV), PORT_ENV, || Ok(DEFAULT_PORT))?;

        let mut network = NetworkConfig::holesky();
        if let Some(rpc_url) = get(RPC_URL_ENV) {
            url::Url::parse(&rpc_url).map_err(|e| ConfigError::Invalid {
                var: RPC_URL_ENV,
                reason: e.to_string(),
            })?;
            network.rpc_url = rpc_url;
        }
        network.chain_id = parse_or(get(CHAIN_ID_ENV), CHAIN_ID_ENV, || Ok(HOLESKY_CHAIN_ID))?;

        let contracts = ContractAddresses {
            deth: parse_or(get(DETH_ADDRESS_ENV), DETH_ADDRESS_ENV, || {
                Ok(HOLESKY_CONTRACTS.deth)
            })?,
            seth: parse_or(get(SETH_ADDRESS_ENV), SETH_ADDRESS_ENV, || {
                Ok(HOLESKY_CONTRACTS.seth)
            })?,
            governance: parse_or(get(GOVERNANCE_ADDRESS_ENV), GOVERNANCE_ADDRESS_ENV, || {
                Ok(HOLESKY_CONTRACTS.governance)
            })?,
            staking_dashboard: parse_or(
                get(STAKING_DASHBOARD_ADDRESS_ENV),
                STAKING_DASHBOARD_ADDRESS_ENV,
                || Ok(HOLESKY_CONTRACTS.staking_dashboard),
            )?,
        };

        let private_key = get(PRIVATE_KEY_ENV).ok_or(ConfigError::Missing(PRIVATE_KEY_ENV))?;
        let log_format = parse_or(get(LOG_FORMAT_ENV), LOG_FORMAT_ENV, || {
            Ok(LogFormat::default())
        })?;

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            network,
            contracts,
            private_key,
            log_format,
        })
    }
}

fn parse_or<T, D>(raw: Option<String>, var: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    D: FnOnce() -> Result<T, String>,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => default().map_err(|reason| ConfigError::Invalid { var, reason }),
    }
}
