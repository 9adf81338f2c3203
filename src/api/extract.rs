// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors and input validation shared by the handlers.
//!
//! Every rejection becomes a 400 `{ "error": ... }` body, so clients see a
//! single error shape whether the JSON, the query string or a path segment
//! was malformed.

use alloy::primitives::{Address, Bytes, U256};
use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::ToSchema;

use crate::blockchain::parse_wei;
use crate::error::ApiError;

/// `Json<T>` with JSON error bodies on rejection.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `Query<T>` with JSON error bodies on rejection.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Integer accepted either as a JSON number or as a decimal string, so
/// values beyond 2^53 can be sent without precision loss.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IntegerInput {
    Number(u64),
    Text(String),
}

impl IntegerInput {
    pub fn to_u256(&self, field: &str) -> Result<U256, ApiError> {
        match self {
            IntegerInput::Number(n) => Ok(U256::from(*n)),
            IntegerInput::Text(raw) => parse_wei(raw)
                .map_err(|_| ApiError::bad_request(format!("{field} must be a non-negative integer"))),
        }
    }
}

/// `0x` followed by 40 hex digits, any casing.
pub fn parse_address(raw: &str) -> Result<Address, ApiError> {
    let invalid = || ApiError::bad_request(format!("Invalid address: {raw}"));
    let hex = raw.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    raw.parse().map_err(|_| invalid())
}

/// Decimal proposal id.
pub fn parse_id(raw: &str) -> Result<U256, ApiError> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::bad_request(format!("Invalid proposal id: {raw}")));
    }
    U256::from_str_radix(raw, 10)
        .map_err(|_| ApiError::bad_request(format!("Invalid proposal id: {raw}")))
}

/// `0x`-prefixed hex call data; `0x` alone is empty call data.
pub fn parse_call_data(raw: &str) -> Result<Bytes, ApiError> {
    let invalid = || ApiError::bad_request("callData must be 0x-prefixed hex");
    let hex = raw.strip_prefix("0x").ok_or_else(invalid)?;
    alloy::hex::decode(hex)
        .map(Bytes::from)
        .map_err(|_| invalid())
}

/// Checksummed rendering used in every response.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}

pub fn checksums(addresses: &[Address]) -> Vec<String> {
    addresses.iter().map(checksum).collect()
}

pub fn decimals(values: &[U256]) -> Vec<String> {
    values.iter().map(U256::to_string).collect()
}
