//! Triad SDK - client library for three-asset liquidity pools
//!
//! Tokens and amounts, canonical triad ordering with CREATE2 pool addresses,
//! slippage-bounded trades, router call assembly and on-chain reads.
//!
//! ```no_run
//! use triad_sdk::{validate_and_parse_address, ChainId, Fetcher, JsonRpcTransport};
//!
//! # async fn run() -> triad_sdk::Result<()> {
//! let chain = ChainId::BinanceTestnet;
//! let fetcher = Fetcher::new(JsonRpcTransport::new(chain.default_rpc_url())?);
//! let address = validate_and_parse_address("0x57c84E7bcbAb211761a0CB91484aE896Aa897ae9")?;
//! let sapx = fetcher.fetch_token_data(chain, address).await?;
//! # let _ = sapx;
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod router;
pub mod tokens;
pub mod trade;
pub mod triad;
pub mod utils;

pub use amount::TokenAmount;
pub use constants::{ChainId, BYTECODE_HASH};
pub use error::{Result, SdkError};
pub use fetcher::{EthCaller, Fetcher, JsonRpcTransport, ProviderTransport};
pub use router::{CallArg, Router, SwapCallParams, SwapMethod, TradeOptions};
pub use tokens::{wrapped_native, Token};
pub use trade::{Trade, TradeType};
pub use triad::{compute_triad_address, sort_tokens, Triad, TriadAddressCache};
pub use utils::validate_and_parse_address;
