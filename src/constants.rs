//! Per-chain static tables for the 3Swap triad deployment
//!
//! Factories and the init-code hash are deployment facts, not derived values.
//! Wrapped-native tokens live in `tokens.rs`.

use alloy_primitives::{address, b256, Address, B256};
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

// ============================================
// CHAINS
// ============================================

/// Chains the triad factory is deployed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum ChainId {
    BinanceTestnet,
    Ropsten,
    MaticTestnet,
    FantomTestnet,
    AvalancheTestnet,
    TelosTestnet,
}

impl ChainId {
    pub const ALL: [ChainId; 6] = [
        ChainId::BinanceTestnet,
        ChainId::Ropsten,
        ChainId::MaticTestnet,
        ChainId::FantomTestnet,
        ChainId::AvalancheTestnet,
        ChainId::TelosTestnet,
    ];

    pub const fn id(self) -> u64 {
        match self {
            ChainId::BinanceTestnet => 97,
            ChainId::Ropsten => 3,
            ChainId::MaticTestnet => 80001,
            ChainId::FantomTestnet => 4002,
            ChainId::AvalancheTestnet => 43113,
            ChainId::TelosTestnet => 41,
        }
    }

    /// Triad factory for this chain
    pub const fn factory(self) -> Address {
        match self {
            ChainId::BinanceTestnet => address!("Fb0C3dbC457DC5C34145b8d202687b97E888DcDc"),
            ChainId::Ropsten => address!("F6a7F229447FB986195c4dC8305553C8A8518d06"),
            ChainId::AvalancheTestnet | ChainId::MaticTestnet | ChainId::FantomTestnet => {
                address!("842CDC95B8BC3A19a8fFc91f200e51c8aF6faFC6")
            }
            ChainId::TelosTestnet => address!("E41d241720FEE7cD6BDfA9aB3204d23687703CD5"),
        }
    }

    /// Public endpoint used when no RPC URL is configured
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            ChainId::BinanceTestnet => "https://data-seed-prebsc-1-s1.binance.org:8545",
            ChainId::Ropsten => "https://rpc.ankr.com/eth_ropsten",
            ChainId::MaticTestnet => "https://rpc-mumbai.maticvigil.com",
            ChainId::FantomTestnet => "https://rpc.testnet.fantom.network",
            ChainId::AvalancheTestnet => "https://api.avax-test.network/ext/bc/C/rpc",
            ChainId::TelosTestnet => "https://testnet.telos.net/evm",
        }
    }
}

impl TryFrom<u64> for ChainId {
    type Error = SdkError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        ChainId::ALL
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or(SdkError::UnsupportedChain(id))
    }
}

impl From<ChainId> for u64 {
    fn from(chain: ChainId) -> u64 {
        chain.id()
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainId::BinanceTestnet => write!(f, "BSC Testnet ({})", self.id()),
            ChainId::Ropsten => write!(f, "Ropsten ({})", self.id()),
            ChainId::MaticTestnet => write!(f, "Mumbai ({})", self.id()),
            ChainId::FantomTestnet => write!(f, "Fantom Testnet ({})", self.id()),
            ChainId::AvalancheTestnet => write!(f, "Fuji ({})", self.id()),
            ChainId::TelosTestnet => write!(f, "Telos Testnet ({})", self.id()),
        }
    }
}

// ============================================
// DEPLOYMENT CONSTANTS
// ============================================

/// keccak256 of the triad contract's creation code (same on every chain)
pub const BYTECODE_HASH: B256 =
    b256!("2612d4eb9dab6652d72a6ec7022aef62794c5601c0fff785c015336a39ee9bde");

/// Basis-point denominator (10000 bps = 100%)
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Decimals of the synthetic liquidity token
pub const LIQUIDITY_TOKEN_DECIMALS: u8 = 18;
pub const LIQUIDITY_TOKEN_NAME: &str = "3Swap Triad Liquidity";
pub const LIQUIDITY_TOKEN_SYMBOL: &str = "3SWAP-LP";
