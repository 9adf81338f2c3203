// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Display formatting shared by the views.

use alloy::primitives::{Address, U256};
use chrono::DateTime;

/// Decimal places shown for token amounts.
pub const DISPLAY_DECIMALS: u32 = 4;

/// Basis points as a percentage with two decimals: `2550` → `"25.50%"`.
pub fn format_percent_bps(bps: U256) -> String {
    let hundred = U256::from(100u64);
    format!("{}.{:0>2}%", bps / hundred, (bps % hundred).to_string())
}

/// An 18-decimal amount rounded to four decimals: `1.23456 ETH` → `"1.2346"`.
pub fn format_token(amount: U256) -> String {
    let unit = U256::from(10u64).pow(U256::from(18 - DISPLAY_DECIMALS));
    let scale = U256::from(10u64).pow(U256::from(DISPLAY_DECIMALS));
    let half = unit / U256::from(2u64);
    let scaled = amount.saturating_add(half) / unit;
    format!(
        "{}.{:0>width$}",
        scaled / scale,
        (scaled % scale).to_string(),
        width = DISPLAY_DECIMALS as usize
    )
}

/// `0x1234...abcd` form of a checksummed address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Unix timestamp in seconds as `YYYY-MM-DD HH:MM UTC`; `-` when unset.
pub fn format_timestamp(timestamp: U256) -> String {
    u64::try_from(timestamp)
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".to_string())
}
