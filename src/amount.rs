//! Token amounts in the smallest on-chain unit
//!
//! All arithmetic is exact `U256` arithmetic. The only lossy conversion is
//! `divide_by_decimal`, which exists for display.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SdkError};
use crate::tokens::Token;

/// `10^decimals`, or `None` when it does not fit in 256 bits
pub(crate) fn decimal_scale(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// A raw integer quantity of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    raw: U256,
    token: Token,
}

impl TokenAmount {
    pub fn new(raw: U256, token: Token) -> Self {
        Self { raw, token }
    }

    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Amounts can only be combined when they are the same token on the same chain
    fn ensure_same_token(&self, other: &TokenAmount) -> Result<()> {
        if self.token.chain_id() != other.token.chain_id() {
            return Err(SdkError::ChainMismatch {
                left: self.token.chain_id().id(),
                right: other.token.chain_id().id(),
            });
        }
        if self.token.address() != other.token.address() {
            return Err(SdkError::MismatchedToken {
                left: self.token.address(),
                right: other.token.address(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &TokenAmount) -> Result<TokenAmount> {
        self.ensure_same_token(other)?;
        let sum = self.raw.checked_add(other.raw).ok_or(SdkError::AmountOverflow)?;
        Ok(TokenAmount::new(sum, self.token.clone()))
    }

    pub fn subtract(&self, other: &TokenAmount) -> Result<TokenAmount> {
        self.ensure_same_token(other)?;
        let diff = self.raw.checked_sub(other.raw).ok_or(SdkError::NegativeAmount {
            minuend: self.raw,
            subtrahend: other.raw,
        })?;
        Ok(TokenAmount::new(diff, self.token.clone()))
    }

    /// Human-scaled value (`raw / 10^decimals`) as a float. Display only.
    pub fn divide_by_decimal(&self) -> f64 {
        // A base-10 U256 string always parses as a finite f64
        let raw: f64 = self.raw.to_string().parse().unwrap_or(f64::MAX);
        raw / 10f64.powi(i32::from(self.token.decimals()))
    }

    /// `0x`-prefixed lowercase hex of the raw amount, no padding
    pub fn to_hex(&self) -> String {
        format!("0x{:x}", self.raw)
    }

    /// Hex of the whole-unit part of the human-scaled amount
    pub fn hex_from_divided(&self) -> String {
        let whole = decimal_scale(self.token.decimals())
            .map(|scale| self.raw / scale)
            .unwrap_or(U256::ZERO);
        format!("0x{:x}", whole)
    }
}

impl std::fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let decimals = usize::from(self.token.decimals());
        // 10^decimals past U256 means raw < 10^decimals, so no whole units
        let (whole, remainder) = match decimal_scale(self.token.decimals()) {
            Some(scale) => (self.raw / scale, self.raw % scale),
            None => (U256::ZERO, self.raw),
        };
        let frac = format!("{:0>width$}", remainder.to_string(), width = decimals);
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() {
            write!(f, "{} {}", whole, self.token.symbol())
        } else {
            write!(f, "{}.{} {}", whole, frac, self.token.symbol())
        }
    }
}
