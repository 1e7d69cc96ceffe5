//! Diagnostic tool - Check configuration and deployment tables
//!
//! Run with: cargo run --bin diagnose

use std::env;

use triad_sdk::config::{Config, DEFAULT_CHAIN_ID, DEFAULT_DEADLINE_SECS, DEFAULT_SLIPPAGE_BPS};
use triad_sdk::fetcher::DEFAULT_REQUEST_TIMEOUT_SECS;
use triad_sdk::{wrapped_native, ChainId, BYTECODE_HASH};

/// Keep the head and tail of long URLs, cutting on char boundaries
fn shorten_url(url: &str) -> String {
    let chars: Vec<char> = url.chars().collect();
    if chars.len() <= 50 {
        return url.to_string();
    }
    let head: String = chars[..30].iter().collect();
    let tail: String = chars[chars.len() - 15..].iter().collect();
    format!("{}...{}", head, tail)
}

fn main() {
    println!("🔍 TRIAD SDK DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let chain_default = DEFAULT_CHAIN_ID.to_string();
    let slippage_default = DEFAULT_SLIPPAGE_BPS.to_string();
    let deadline_default = DEFAULT_DEADLINE_SECS.to_string();
    let timeout_default = DEFAULT_REQUEST_TIMEOUT_SECS.to_string();
    let checks = [
        ("CHAIN_ID", chain_default.as_str(), "Chain to query"),
        ("SLIPPAGE_BPS", slippage_default.as_str(), "Slippage tolerance (basis points)"),
        ("DEADLINE_SECS", deadline_default.as_str(), "Seconds until a swap expires"),
        ("REQUEST_TIMEOUT_SECS", timeout_default.as_str(), "JSON-RPC request timeout"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    let rpc = env::var("RPC_URL").unwrap_or_else(|_| "NOT SET (chain default)".to_string());
    println!("  RPC_URL:   {}", shorten_url(&rpc));
    println!(
        "  RECIPIENT: {}",
        if env::var("RECIPIENT").is_ok() { "✅ Set" } else { "❌ Not set" }
    );

    println!("\n═══════════════════════════════════════════════════");
    println!("                    VALIDATION                      ");
    println!("═══════════════════════════════════════════════════\n");

    let config = Config::from_lookup(|key| env::var(key).ok());
    match config.validate() {
        Ok(()) => println!("  ✅ Configuration is valid"),
        Err(e) => println!("  ❌ {}", e),
    }

    println!("\n═══════════════════════════════════════════════════");
    println!("                   DEPLOYMENTS                      ");
    println!("═══════════════════════════════════════════════════\n");

    println!("  Init code hash: {}\n", BYTECODE_HASH);
    for chain in ChainId::ALL {
        let selected = if chain.id() == config.chain_id { "▶" } else { " " };
        println!("{} {}", selected, chain);
        println!("    Factory: {}", chain.factory());
        match wrapped_native(chain) {
            Some(token) => println!("    Native:  {} ({})", token.symbol(), token.address()),
            None => println!("    Native:  ⚠️  none (native-currency swaps unsupported)"),
        }
        println!("    RPC:     {}\n", chain.default_rpc_url());
    }

    if ChainId::try_from(config.chain_id).is_err() {
        println!("  ⚠️  CHAIN_ID {} has no triad deployment.", config.chain_id);
        println!("     Supported: {:?}\n", ChainId::ALL.map(|c| c.id()));
    }

    println!("✅ Diagnostic complete!\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_url() {
        assert_eq!(shorten_url("http://localhost:8545"), "http://localhost:8545");

        let long = format!("https://rpc.example.org/v1/{}", "a".repeat(40));
        let short = shorten_url(&long);
        assert_eq!(short, format!("https://rpc.example.org/v1/aaa...{}", "a".repeat(15)));
    }

    #[test]
    fn test_shorten_url_multibyte() {
        let url = format!("https://{}/key", "é".repeat(60));
        let short = shorten_url(&url);
        assert_eq!(short.chars().count(), 48);
        assert!(short.ends_with("ééééééééééé/key"));
    }
}
