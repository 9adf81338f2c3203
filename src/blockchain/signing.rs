// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server signer loading.
//!
//! The gateway key may be given either as raw hex or as a PEM document
//! (PKCS#8 or SEC1), as produced by `openssl genpkey`.

use alloy::signers::local::PrivateKeySigner;
use k256::SecretKey;

use super::client::{create_signer, ChainError};

/// Parse a private key from PEM format to hex string.
///
/// # Returns
/// * `Ok(String)` - Hex-encoded private key (64 characters, no 0x prefix)
/// * `Err(ChainError)` - If PEM parsing fails
pub fn pem_to_hex(pem_bytes: &[u8]) -> Result<String, ChainError> {
    let pem_str = std::str::from_utf8(pem_bytes)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid UTF-8: {}", e)))?;

    let pem = pem::parse(pem_str)
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid PEM: {}", e)))?;

    let secret_key = SecretKey::from_sec1_der(pem.contents())
        .or_else(|_| parse_pkcs8_to_secret_key(pem.contents()))
        .map_err(|e| ChainError::InvalidPrivateKey(format!("Invalid key format: {}", e)))?;

    Ok(alloy::hex::encode(secret_key.to_bytes()))
}

fn parse_pkcs8_to_secret_key(der: &[u8]) -> Result<SecretKey, String> {
    use k256::pkcs8::DecodePrivateKey;
    SecretKey::from_pkcs8_der(der).map_err(|e| e.to_string())
}

/// Load the gateway signer from a configured key, hex or PEM.
pub fn signer_from_key(raw: &str) -> Result<PrivateKeySigner, ChainError> {
    let raw = raw.trim();
    if raw.starts_with("-----BEGIN") {
        let hex_key = pem_to_hex(raw.as_bytes())?;
        create_signer(&hex_key)
    } else {
        create_signer(raw)
    }
}
