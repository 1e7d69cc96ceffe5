//! Address validation and hex helpers

use alloy_primitives::Address;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Result, SdkError};

/// Parse a hex address, enforcing EIP-55 when the input is mixed-case.
///
/// All-lowercase or all-uppercase input is accepted with a warning since it
/// carries no checksum.
pub fn validate_and_parse_address(input: &str) -> Result<Address> {
    let trimmed = input.trim();
    let address = Address::from_str(trimmed).map_err(|_| SdkError::InvalidAddress(input.to_string()))?;

    let checksummed = address.to_checksum(None);
    if trimmed == checksummed {
        return Ok(address);
    }

    let body = trimmed.trim_start_matches("0x").trim_start_matches("0X");
    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(SdkError::InvalidAddress(input.to_string()));
    }

    warn!("Address not checksummed: {} (expected {})", trimmed, checksummed);
    Ok(address)
}

/// `0x`-prefixed lowercase hex of an unsigned integer
pub fn number_to_hex(num: u64) -> String {
    format!("0x{:x}", num)
}
