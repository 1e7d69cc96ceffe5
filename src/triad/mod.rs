//! Triads: three-token liquidity pools
//!
//! A triad's tokens are kept in canonical (ascending address) order. The pool
//! address is derived with CREATE2 from the chain's factory, the packed sorted
//! addresses and the pool init-code hash, so it needs no chain read.

mod cache;

pub use cache::{TriadAddressCache, TriadKey};

use alloy_primitives::{keccak256, Address, B256};
use serde::Serialize;

use crate::amount::TokenAmount;
use crate::constants::{
    ChainId, BYTECODE_HASH, LIQUIDITY_TOKEN_DECIMALS, LIQUIDITY_TOKEN_NAME, LIQUIDITY_TOKEN_SYMBOL,
};
use crate::error::{Result, SdkError};
use crate::tokens::Token;

// ============================================
// CANONICAL ORDER
// ============================================

/// Put three items in canonical token order.
///
/// Three compare-and-swaps (0-1, 1-2, 0-1) form a complete sorting network for
/// three elements. Fails if any two tokens are on different chains or equal.
fn sort_canonical<T, F>(mut items: [T; 3], token_of: F) -> Result<[T; 3]>
where
    F: Fn(&T) -> &Token,
{
    // Reject duplicates up front so the result never depends on which pair
    // the network happens to compare.
    for (i, j) in [(0, 1), (1, 2), (0, 2)] {
        token_of(&items[i]).sorts_before(token_of(&items[j]))?;
    }

    for (i, j) in [(0, 1), (1, 2), (0, 1)] {
        if token_of(&items[j]).sorts_before(token_of(&items[i]))? {
            items.swap(i, j);
        }
    }
    Ok(items)
}

/// Canonically ordered copy of three tokens
pub fn sort_tokens(tokens: [Token; 3]) -> Result<[Token; 3]> {
    sort_canonical(tokens, |t| t)
}

// ============================================
// ADDRESS DERIVATION
// ============================================

/// CREATE2 address of the triad for already-sorted token addresses.
///
/// `salt = keccak256(addr0 ++ addr1 ++ addr2)` over the raw 20-byte values
/// (packed encoding, no padding).
pub fn compute_triad_address(factory: Address, init_code_hash: B256, sorted: &[Address; 3]) -> Address {
    let mut packed = [0u8; 60];
    for (chunk, addr) in packed.chunks_exact_mut(20).zip(sorted) {
        chunk.copy_from_slice(addr.as_slice());
    }
    let salt = keccak256(packed);
    factory.create2(salt.0, init_code_hash.0)
}

// ============================================
// TRIAD
// ============================================

/// A three-token pool with reserves aligned to its canonical token order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Triad {
    liquidity_token: Token,
    reserves: [TokenAmount; 3],
}

impl Triad {
    /// Build a triad from unsorted reserves, using the shared address cache
    pub fn new(amount_a: TokenAmount, amount_b: TokenAmount, amount_c: TokenAmount) -> Result<Self> {
        Self::with_cache(TriadAddressCache::shared(), amount_a, amount_b, amount_c)
    }

    /// Build a triad from unsorted reserves, using the given address cache
    pub fn with_cache(
        cache: &TriadAddressCache,
        amount_a: TokenAmount,
        amount_b: TokenAmount,
        amount_c: TokenAmount,
    ) -> Result<Self> {
        let reserves = sort_canonical([amount_a, amount_b, amount_c], |a| a.token())?;
        let chain_id = reserves[0].token().chain_id();
        let sorted = [
            reserves[0].token().address(),
            reserves[1].token().address(),
            reserves[2].token().address(),
        ];
        let address = Self::cached_address(cache, chain_id, sorted);

        let liquidity_token = Token::new(
            address,
            chain_id,
            LIQUIDITY_TOKEN_DECIMALS,
            LIQUIDITY_TOKEN_NAME,
            LIQUIDITY_TOKEN_SYMBOL,
        );

        Ok(Self { liquidity_token, reserves })
    }

    /// Pool address for three tokens in any order, using the shared cache
    pub fn get_address(token_a: &Token, token_b: &Token, token_c: &Token, chain_id: ChainId) -> Result<Address> {
        Self::get_address_with(TriadAddressCache::shared(), token_a, token_b, token_c, chain_id)
    }

    /// Pool address for three tokens in any order.
    ///
    /// All three tokens must be on `chain_id` and pairwise distinct.
    pub fn get_address_with(
        cache: &TriadAddressCache,
        token_a: &Token,
        token_b: &Token,
        token_c: &Token,
        chain_id: ChainId,
    ) -> Result<Address> {
        for token in [token_a, token_b, token_c] {
            if token.chain_id() != chain_id {
                return Err(SdkError::ChainMismatch {
                    left: chain_id.id(),
                    right: token.chain_id().id(),
                });
            }
        }
        let sorted = sort_canonical([token_a, token_b, token_c], |t| *t)?;
        let key = [sorted[0].address(), sorted[1].address(), sorted[2].address()];
        Ok(Self::cached_address(cache, chain_id, key))
    }

    fn cached_address(cache: &TriadAddressCache, chain_id: ChainId, sorted: [Address; 3]) -> Address {
        cache.get_or_insert_with((chain_id, sorted), || {
            compute_triad_address(chain_id.factory(), BYTECODE_HASH, &sorted)
        })
    }

    /// Pool address (same as the liquidity token's address)
    pub fn address(&self) -> Address {
        self.liquidity_token.address()
    }

    pub fn chain_id(&self) -> ChainId {
        self.liquidity_token.chain_id()
    }

    pub fn liquidity_token(&self) -> &Token {
        &self.liquidity_token
    }

    pub fn token0(&self) -> &Token {
        self.reserves[0].token()
    }

    pub fn token1(&self) -> &Token {
        self.reserves[1].token()
    }

    pub fn token2(&self) -> &Token {
        self.reserves[2].token()
    }

    /// Tokens in canonical order
    pub fn tokens(&self) -> [&Token; 3] {
        [self.token0(), self.token1(), self.token2()]
    }

    pub fn reserve0(&self) -> &TokenAmount {
        &self.reserves[0]
    }

    pub fn reserve1(&self) -> &TokenAmount {
        &self.reserves[1]
    }

    pub fn reserve2(&self) -> &TokenAmount {
        &self.reserves[2]
    }

    pub fn reserves(&self) -> &[TokenAmount; 3] {
        &self.reserves
    }

    pub fn includes_token(&self, token: &Token) -> bool {
        self.tokens().into_iter().any(|t| t == token)
    }

    /// Reserve held for `token`
    pub fn reserve_of(&self, token: &Token) -> Result<&TokenAmount> {
        self.reserves
            .iter()
            .find(|r| r.token() == token)
            .ok_or_else(|| SdkError::MismatchedToken {
                left: self.address(),
                right: token.address(),
            })
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::wrapped_native;
    use alloy_primitives::{address, U256};

    fn sapx() -> Token {
        Token::new(
            address!("57c84e7bcbab211761a0cb91484ae896aa897ae9"),
            ChainId::BinanceTestnet,
            18,
            "3Swap 0x",
            "SAPX",
        )
    }

    fn busd() -> Token {
        Token::new(
            address!("ed24fc36d5ee211ea25a80239fb8c4cfd80f12ee"),
            ChainId::BinanceTestnet,
            18,
            "BUSD Token",
            "BUSD",
        )
    }

    fn wbnb() -> Token {
        wrapped_native(ChainId::BinanceTestnet).unwrap()
    }

    fn token_at(chain_id: ChainId, last_byte: u8) -> Token {
        Token::new(Address::with_last_byte(last_byte), chain_id, 18, "T", "T")
    }

    /// Known deployment on BSC testnet for SAPX / BUSD / WBNB
    const SAPX_BUSD_WBNB: Address = address!("64b15069883901ca7dD28d1DBf400E531a50B744");

    #[test]
    fn test_sort_tokens_all_permutations() {
        let (a, b, c) = (sapx(), busd(), wbnb());
        // 0x57.. < 0xEB.. < 0xed..
        let expected = [a.clone(), c.clone(), b.clone()];
        let permutations = [
            [a.clone(), b.clone(), c.clone()],
            [a.clone(), c.clone(), b.clone()],
            [b.clone(), a.clone(), c.clone()],
            [b.clone(), c.clone(), a.clone()],
            [c.clone(), a.clone(), b.clone()],
            [c.clone(), b.clone(), a.clone()],
        ];
        for perm in permutations {
            let sorted = sort_tokens(perm).unwrap();
            assert_eq!(sorted, expected);
            assert!(sorted[0].sorts_before(&sorted[1]).unwrap());
            assert!(sorted[1].sorts_before(&sorted[2]).unwrap());
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let once = sort_tokens([busd(), wbnb(), sapx()]).unwrap();
        let twice = sort_tokens(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_rejects_duplicates_in_any_position() {
        let dup = sapx();
        for tokens in [
            [dup.clone(), dup.clone(), busd()],
            [dup.clone(), busd(), dup.clone()],
            [busd(), dup.clone(), dup.clone()],
        ] {
            assert_eq!(sort_tokens(tokens), Err(SdkError::IdenticalToken(dup.address())));
        }
    }

    #[test]
    fn test_known_pool_address() {
        let cache = TriadAddressCache::new();
        let addr = Triad::get_address_with(&cache, &sapx(), &busd(), &wbnb(), ChainId::BinanceTestnet).unwrap();
        assert_eq!(addr, SAPX_BUSD_WBNB);
    }

    #[test]
    fn test_address_is_order_invariant() {
        let cache = TriadAddressCache::new();
        let chain = ChainId::BinanceTestnet;
        let (a, b, c) = (sapx(), busd(), wbnb());
        let abc = Triad::get_address_with(&cache, &a, &b, &c, chain).unwrap();
        assert_eq!(Triad::get_address_with(&cache, &b, &c, &a, chain).unwrap(), abc);
        assert_eq!(Triad::get_address_with(&cache, &c, &a, &b, chain).unwrap(), abc);
        assert_eq!(Triad::get_address_with(&cache, &c, &b, &a, chain).unwrap(), abc);
    }

    #[test]
    fn test_address_differs_per_token_set_and_factory() {
        let cache = TriadAddressCache::new();
        let base = Triad::get_address_with(&cache, &sapx(), &busd(), &wbnb(), ChainId::BinanceTestnet).unwrap();

        let other = token_at(ChainId::BinanceTestnet, 9);
        let swapped = Triad::get_address_with(&cache, &sapx(), &busd(), &other, ChainId::BinanceTestnet).unwrap();
        assert_ne!(base, swapped);

        let (x, y, z) = (
            token_at(ChainId::Ropsten, 1),
            token_at(ChainId::Ropsten, 2),
            token_at(ChainId::Ropsten, 3),
        );
        let on_ropsten = Triad::get_address_with(&cache, &x, &y, &z, ChainId::Ropsten).unwrap();
        let on_bsc = Triad::get_address_with(
            &cache,
            &token_at(ChainId::BinanceTestnet, 1),
            &token_at(ChainId::BinanceTestnet, 2),
            &token_at(ChainId::BinanceTestnet, 3),
            ChainId::BinanceTestnet,
        )
        .unwrap();
        assert_ne!(on_ropsten, on_bsc);
    }

    #[test]
    fn test_get_address_rejects_foreign_token() {
        let cache = TriadAddressCache::new();
        let foreign = token_at(ChainId::Ropsten, 1);
        assert_eq!(
            Triad::get_address_with(&cache, &sapx(), &busd(), &foreign, ChainId::BinanceTestnet),
            Err(SdkError::ChainMismatch { left: 97, right: 3 })
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn test_address_is_cached() {
        let cache = TriadAddressCache::new();
        let chain = ChainId::BinanceTestnet;
        let first = Triad::get_address_with(&cache, &sapx(), &busd(), &wbnb(), chain).unwrap();
        assert_eq!(cache.len(), 1);

        let key = (chain, [sapx().address(), wbnb().address(), busd().address()]);
        assert_eq!(cache.get(&key), Some(first));

        let second = Triad::get_address_with(&cache, &wbnb(), &sapx(), &busd(), chain).unwrap();
        assert_eq!(second, first);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_new_aligns_reserves() {
        let cache = TriadAddressCache::new();
        let triad = Triad::with_cache(
            &cache,
            TokenAmount::new(U256::from(300u64), busd()),
            TokenAmount::new(U256::from(100u64), sapx()),
            TokenAmount::new(U256::from(200u64), wbnb()),
        )
        .unwrap();

        assert_eq!(triad.token0(), &sapx());
        assert_eq!(triad.token1(), &wbnb());
        assert_eq!(triad.token2(), &busd());
        assert_eq!(triad.reserve0().raw(), U256::from(100u64));
        assert_eq!(triad.reserve1().raw(), U256::from(200u64));
        assert_eq!(triad.reserve2().raw(), U256::from(300u64));
        assert_eq!(triad.reserve_of(&busd()).unwrap().raw(), U256::from(300u64));

        assert_eq!(triad.address(), SAPX_BUSD_WBNB);
        let lp = triad.liquidity_token();
        assert_eq!(lp.decimals(), 18);
        assert_eq!(lp.symbol(), LIQUIDITY_TOKEN_SYMBOL);
        assert_eq!(lp.chain_id(), ChainId::BinanceTestnet);
    }

    #[test]
    fn test_includes_token() {
        let cache = TriadAddressCache::new();
        let triad = Triad::with_cache(
            &cache,
            TokenAmount::new(U256::ZERO, sapx()),
            TokenAmount::new(U256::ZERO, busd()),
            TokenAmount::new(U256::ZERO, wbnb()),
        )
        .unwrap();

        assert!(triad.includes_token(&sapx()));
        assert!(triad.includes_token(&wbnb()));
        let stranger = token_at(ChainId::BinanceTestnet, 7);
        assert!(!triad.includes_token(&stranger));
        assert!(triad.reserve_of(&stranger).is_err());
    }

    #[test]
    fn test_new_rejects_mixed_chains() {
        let cache = TriadAddressCache::new();
        let result = Triad::with_cache(
            &cache,
            TokenAmount::new(U256::ZERO, sapx()),
            TokenAmount::new(U256::ZERO, busd()),
            TokenAmount::new(U256::ZERO, token_at(ChainId::Ropsten, 1)),
        );
        assert!(matches!(result, Err(SdkError::ChainMismatch { .. })));
    }

    #[test]
    fn test_shared_cache_entry_points() {
        let addr = Triad::get_address(&sapx(), &busd(), &wbnb(), ChainId::BinanceTestnet).unwrap();
        assert_eq!(addr, SAPX_BUSD_WBNB);
        let triad = Triad::new(
            TokenAmount::new(U256::ZERO, wbnb()),
            TokenAmount::new(U256::ZERO, busd()),
            TokenAmount::new(U256::ZERO, sapx()),
        )
        .unwrap();
        assert_eq!(triad.address(), SAPX_BUSD_WBNB);
    }
}
