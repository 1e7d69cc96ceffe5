//! Token definitions
//!
//! A `Token` is a chain-scoped asset identity. Equality and hashing only look
//! at `(chain_id, address)`; name, symbol and decimals are metadata.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::constants::ChainId;
use crate::error::{Result, SdkError};

/// An ERC-20 token on a specific chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    address: Address,
    chain_id: ChainId,
    decimals: u8,
    name: String,
    symbol: String,
}

impl Token {
    pub fn new(
        address: Address,
        chain_id: ChainId,
        decimals: u8,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            address,
            chain_id,
            decimals,
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Canonical order between two tokens of the same chain.
    ///
    /// Addresses are compared as 20-byte values, which is the same order as
    /// comparing their lowercase hex strings.
    pub fn sorts_before(&self, other: &Token) -> Result<bool> {
        if self.chain_id != other.chain_id {
            return Err(SdkError::ChainMismatch {
                left: self.chain_id.id(),
                right: other.chain_id.id(),
            });
        }
        if self.address == other.address {
            return Err(SdkError::IdenticalToken(self.address));
        }
        Ok(self.address < other.address)
    }

    /// Whether this is the wrapped native currency of its chain
    pub fn is_wrapped_native(&self) -> bool {
        wrapped_native(self.chain_id).is_some_and(|w| w == *self)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

// ============================================
// WRAPPED NATIVE TOKENS
// ============================================

/// Wrapped native currency per chain. Telos has no deployment.
pub fn wrapped_native(chain_id: ChainId) -> Option<Token> {
    let (addr, name, symbol) = match chain_id {
        ChainId::BinanceTestnet => (
            address!("EB23ab7CFf701BB4180C519BCD5FB85d6C30cD94"),
            "Wrapped Binance Coin",
            "WBNB",
        ),
        ChainId::Ropsten => (
            address!("ec5A20480c49B9286388F72f1AA95aF0D2525c94"),
            "Wrapped Ether",
            "WETH",
        ),
        ChainId::FantomTestnet => (
            address!("C481263897F96B4781219EDF5cfAa95ec49c200c"),
            "Wrapped Fantom",
            "WFTM",
        ),
        ChainId::AvalancheTestnet => (
            address!("C481263897F96B4781219EDF5cfAa95ec49c200c"),
            "Wrapped Avalanche Coin",
            "WAVAX",
        ),
        ChainId::MaticTestnet => (
            address!("C481263897F96B4781219EDF5cfAa95ec49c200c"),
            "Wrapped Matic",
            "WMATIC",
        ),
        ChainId::TelosTestnet => return None,
    };

    Some(Token::new(addr, chain_id, 18, name, symbol))
}

/// All wrapped native tokens with a deployment
pub fn all_wrapped_natives() -> Vec<Token> {
    ChainId::ALL.into_iter().filter_map(wrapped_native).collect()
}
