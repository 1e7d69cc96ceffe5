//! On-chain reads that populate tokens and triads
//!
//! Every read is an `eth_call` through an [`EthCaller`]. Independent reads are
//! joined with `try_join!`, so the first failure aborts the fetch.

mod transport;

pub use transport::{EthCaller, JsonRpcTransport, ProviderTransport, DEFAULT_REQUEST_TIMEOUT_SECS};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use futures::try_join;
use tracing::{debug, info};

use crate::amount::TokenAmount;
use crate::constants::ChainId;
use crate::error::{Result, SdkError};
use crate::tokens::Token;
use crate::triad::{sort_tokens, Triad, TriadAddressCache};

// ============================================
// CONTRACT INTERFACES
// ============================================

sol! {
    interface IERC20 {
        function decimals() external view returns (uint8);
        function name() external view returns (string);
        function symbol() external view returns (string);
    }

    interface I3SwapTriad {
        function getReserves() external view returns (
            uint112 reserve0,
            uint112 reserve1,
            uint112 reserve2,
            uint32 blockTimestampLast
        );
    }
}

/// Reads token metadata and triad reserves through an `eth_call` transport
pub struct Fetcher<'c, C: EthCaller> {
    caller: C,
    cache: &'c TriadAddressCache,
}

impl<C: EthCaller> Fetcher<'static, C> {
    /// Fetcher backed by the process-wide triad address cache
    pub fn new(caller: C) -> Self {
        Self {
            caller,
            cache: TriadAddressCache::shared(),
        }
    }
}

impl<'c, C: EthCaller> Fetcher<'c, C> {
    pub fn with_cache(caller: C, cache: &'c TriadAddressCache) -> Self {
        Self { caller, cache }
    }

    pub fn caller(&self) -> &C {
        &self.caller
    }

    async fn read<T: SolCall>(&self, to: Address, call: T) -> Result<T::Return> {
        debug!("eth_call {} on {}", T::SIGNATURE, to);
        let data = Bytes::from(call.abi_encode());
        let output = self.caller.eth_call(to, data).await?;
        T::abi_decode_returns(&output).map_err(|e| SdkError::Decode(format!("{} from {}: {}", T::SIGNATURE, to, e)))
    }

    /// Query `decimals()`, `name()` and `symbol()` concurrently
    pub async fn fetch_token_data(&self, chain_id: ChainId, address: Address) -> Result<Token> {
        let (decimals, name, symbol) = try_join!(
            self.read(address, IERC20::decimalsCall {}),
            self.read(address, IERC20::nameCall {}),
            self.read(address, IERC20::symbolCall {}),
        )?;

        info!("Fetched token {} ({}) at {} with {} decimals", symbol, name, address, decimals);
        Ok(Token::new(address, chain_id, decimals, name, symbol))
    }

    /// Fetch metadata for three tokens concurrently
    pub async fn fetch_tokens(&self, chain_id: ChainId, addresses: [Address; 3]) -> Result<[Token; 3]> {
        let (a, b, c) = try_join!(
            self.fetch_token_data(chain_id, addresses[0]),
            self.fetch_token_data(chain_id, addresses[1]),
            self.fetch_token_data(chain_id, addresses[2]),
        )?;
        Ok([a, b, c])
    }

    /// Derive the triad address locally and read its reserves.
    ///
    /// Reserves come back in canonical token order and are attached to the
    /// sorted tokens.
    pub async fn fetch_triad_data(&self, token_a: &Token, token_b: &Token, token_c: &Token) -> Result<Triad> {
        let chain_id = token_a.chain_id();
        let address = Triad::get_address_with(self.cache, token_a, token_b, token_c, chain_id)?;
        let sorted = sort_tokens([token_a.clone(), token_b.clone(), token_c.clone()])?;

        let reserves = self.read(address, I3SwapTriad::getReservesCall {}).await?;
        debug!(
            "Triad {} reserves: {} / {} / {} (ts {})",
            address, reserves.reserve0, reserves.reserve1, reserves.reserve2, reserves.blockTimestampLast
        );

        let [token0, token1, token2] = sorted;
        let triad = Triad::with_cache(
            self.cache,
            TokenAmount::new(U256::from(reserves.reserve0.to::<u128>()), token0),
            TokenAmount::new(U256::from(reserves.reserve1.to::<u128>()), token1),
            TokenAmount::new(U256::from(reserves.reserve2.to::<u128>()), token2),
        )?;

        info!(
            "Fetched triad {} ({}/{}/{})",
            triad.address(),
            triad.token0().symbol(),
            triad.token1().symbol(),
            triad.token2().symbol()
        );
        Ok(triad)
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::wrapped_native;
    use alloy_primitives::address;
    use alloy_sol_types::SolValue;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SAPX: Address = address!("57c84e7bcbab211761a0cb91484ae896aa897ae9");
    const BUSD: Address = address!("ed24fc36d5ee211ea25a80239fb8c4cfd80f12ee");
    const TRIAD: Address = address!("64b15069883901ca7dD28d1DBf400E531a50B744");

    /// Canned responses keyed by contract and selector
    #[derive(Default)]
    struct MockCaller {
        responses: HashMap<(Address, [u8; 4]), Result<Vec<u8>>>,
        calls: AtomicUsize,
    }

    impl MockCaller {
        fn respond(mut self, to: Address, selector: [u8; 4], output: Result<Vec<u8>>) -> Self {
            self.responses.insert((to, selector), output);
            self
        }

        fn with_token(self, to: Address, decimals: u8, name: &str, symbol: &str) -> Self {
            self.respond(to, IERC20::decimalsCall::SELECTOR, Ok(U256::from(decimals).abi_encode()))
                .respond(to, IERC20::nameCall::SELECTOR, Ok(name.to_string().abi_encode()))
                .respond(to, IERC20::symbolCall::SELECTOR, Ok(symbol.to_string().abi_encode()))
        }
    }

    #[async_trait]
    impl EthCaller for MockCaller {
        async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let selector: [u8; 4] = data[..4].try_into().unwrap();
            match self.responses.get(&(to, selector)) {
                Some(Ok(output)) => Ok(Bytes::from(output.clone())),
                Some(Err(e)) => Err(e.clone()),
                None => Err(SdkError::Transport {
                    status: Some(-32000),
                    message: "execution reverted".to_string(),
                }),
            }
        }
    }

    fn bsc_token(addr: Address, symbol: &str) -> Token {
        Token::new(addr, ChainId::BinanceTestnet, 18, symbol, symbol)
    }

    #[test]
    fn test_fetch_token_data() {
        let caller = MockCaller::default().with_token(SAPX, 9, "Sapphire X", "SAPX");
        let fetcher = Fetcher::new(caller);

        let token = tokio_test::block_on(fetcher.fetch_token_data(ChainId::BinanceTestnet, SAPX)).unwrap();
        assert_eq!(token.address(), SAPX);
        assert_eq!(token.chain_id(), ChainId::BinanceTestnet);
        assert_eq!(token.decimals(), 9);
        assert_eq!(token.name(), "Sapphire X");
        assert_eq!(token.symbol(), "SAPX");
        assert_eq!(fetcher.caller().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_fetch_token_data_propagates_transport_error() {
        let unavailable = SdkError::Transport {
            status: Some(503),
            message: "service unavailable".to_string(),
        };
        let caller = MockCaller::default()
            .with_token(SAPX, 18, "Sapphire X", "SAPX")
            .respond(SAPX, IERC20::symbolCall::SELECTOR, Err(unavailable.clone()));
        let fetcher = Fetcher::new(caller);

        let result = tokio_test::block_on(fetcher.fetch_token_data(ChainId::BinanceTestnet, SAPX));
        assert_eq!(result, Err(unavailable));
    }

    #[test]
    fn test_fetch_token_data_rejects_malformed_output() {
        let caller = MockCaller::default()
            .with_token(SAPX, 18, "Sapphire X", "SAPX")
            .respond(SAPX, IERC20::decimalsCall::SELECTOR, Ok(vec![0x01, 0x02]));
        let fetcher = Fetcher::new(caller);

        let result = tokio_test::block_on(fetcher.fetch_token_data(ChainId::BinanceTestnet, SAPX));
        assert!(matches!(result, Err(SdkError::Decode(_))));
    }

    #[test]
    fn test_fetch_tokens() {
        let wbnb = wrapped_native(ChainId::BinanceTestnet).unwrap();
        let caller = MockCaller::default()
            .with_token(SAPX, 18, "Sapphire X", "SAPX")
            .with_token(BUSD, 18, "Binance USD", "BUSD")
            .with_token(wbnb.address(), 18, "Wrapped BNB", "WBNB");
        let fetcher = Fetcher::new(caller);

        let tokens =
            tokio_test::block_on(fetcher.fetch_tokens(ChainId::BinanceTestnet, [BUSD, SAPX, wbnb.address()])).unwrap();
        let symbols: Vec<&str> = tokens.iter().map(|t| t.symbol()).collect();
        assert_eq!(symbols, ["BUSD", "SAPX", "WBNB"]);
    }

    #[test]
    fn test_fetch_triad_data() {
        let sapx = bsc_token(SAPX, "SAPX");
        let busd = bsc_token(BUSD, "BUSD");
        let wbnb = wrapped_native(ChainId::BinanceTestnet).unwrap();

        let reserves = (U256::from(100u64), U256::from(200u64), U256::from(300u64), 1_700_000_000u32);
        let caller = MockCaller::default().respond(
            TRIAD,
            I3SwapTriad::getReservesCall::SELECTOR,
            Ok(reserves.abi_encode_params()),
        );
        let cache = TriadAddressCache::new();
        let fetcher = Fetcher::with_cache(caller, &cache);

        let triad = tokio_test::block_on(fetcher.fetch_triad_data(&busd, &wbnb, &sapx)).unwrap();
        assert_eq!(triad.address(), TRIAD);
        assert_eq!(cache.len(), 1);

        // Canonical order is SAPX < WBNB < BUSD
        assert_eq!(triad.token0(), &sapx);
        assert_eq!(triad.token1(), &wbnb);
        assert_eq!(triad.token2(), &busd);
        assert_eq!(triad.reserve0().raw(), U256::from(100u64));
        assert_eq!(triad.reserve1().raw(), U256::from(200u64));
        assert_eq!(triad.reserve2().raw(), U256::from(300u64));
        assert_eq!(triad.reserve_of(&busd).unwrap().raw(), U256::from(300u64));
    }

    #[test]
    fn test_fetch_triad_data_checks_tokens_before_reading() {
        let sapx = bsc_token(SAPX, "SAPX");
        let busd = bsc_token(BUSD, "BUSD");
        let fetcher = Fetcher::with_cache(MockCaller::default(), TriadAddressCache::shared());

        let result = tokio_test::block_on(fetcher.fetch_triad_data(&sapx, &busd, &sapx));
        assert_eq!(result.unwrap_err(), SdkError::IdenticalToken(SAPX));
        assert_eq!(fetcher.caller().calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_fetch_triad_data_surfaces_revert() {
        let sapx = bsc_token(SAPX, "SAPX");
        let busd = bsc_token(BUSD, "BUSD");
        let wbnb = wrapped_native(ChainId::BinanceTestnet).unwrap();
        let fetcher = Fetcher::new(MockCaller::default());

        let result = tokio_test::block_on(fetcher.fetch_triad_data(&sapx, &busd, &wbnb));
        assert!(matches!(result, Err(SdkError::Transport { status: Some(-32000), .. })));
    }
}
