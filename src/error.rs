//! Error types for the triad SDK
//!
//! Every precondition is checked before any work is done, so an `Err` never
//! leaves a half-built value behind.

use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, SdkError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    /// Operands (or a trade and its target chain) live on different chains
    #[error("operation on different chains: {left} vs {right}")]
    ChainMismatch { left: u64, right: u64 },

    /// A token was compared or swapped against itself
    #[error("identical token {0}")]
    IdenticalToken(Address),

    /// Arithmetic between amounts of two different tokens
    #[error("amounts must be of the same token: {left} vs {right}")]
    MismatchedToken { left: Address, right: Address },

    #[error("subtraction would go negative: {minuend} - {subtrahend}")]
    NegativeAmount { minuend: U256, subtrahend: U256 },

    #[error("amount overflows 256 bits")]
    AmountOverflow,

    #[error("invalid slippage: {0} bps")]
    InvalidSlippage(i64),

    #[error("deadline must be greater than 0 (got {0}s)")]
    InvalidDeadline(i64),

    /// Wrapped-native leg is not where the router expects it
    #[error("invalid swap path: {0}")]
    InvalidPath(String),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    /// No factory / wrapped-native / RPC entry for this chain
    #[error("unsupported chain id {0}")]
    UnsupportedChain(u64),

    /// Propagated from the JSON-RPC collaborator. `status` is the HTTP status
    /// or the JSON-RPC error code when one was returned.
    #[error("transport error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Transport { status: Option<i64>, message: String },

    #[error("failed to decode call result: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        SdkError::Transport {
            status: e.status().map(|s| i64::from(s.as_u16())),
            message: e.to_string(),
        }
    }
}

impl From<alloy_sol_types::Error> for SdkError {
    fn from(e: alloy_sol_types::Error) -> Self {
        SdkError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let with_status = SdkError::Transport { status: Some(503), message: "unavailable".into() };
        assert_eq!(with_status.to_string(), "transport error (503): unavailable");

        let without = SdkError::Transport { status: None, message: "connection reset".into() };
        assert_eq!(without.to_string(), "transport error: connection reset");
    }
}
