//! Client configuration for the triad SDK binaries
//!
//! Values come from the environment (and `.env`) or a TOML file. Library
//! calls take explicit arguments; this is only the application layer.

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::constants::ChainId;
use crate::fetcher::DEFAULT_REQUEST_TIMEOUT_SECS;
use crate::router::TradeOptions;
use crate::utils::validate_and_parse_address;

/// Default chain when `CHAIN_ID` is unset (BSC testnet)
pub const DEFAULT_CHAIN_ID: u64 = 97;

/// 0.5%
pub const DEFAULT_SLIPPAGE_BPS: i64 = 50;

/// 20 minutes
pub const DEFAULT_DEADLINE_SECS: i64 = 1_200;

// ============================================
// MAIN CONFIGURATION
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// Chain ID (97 = BSC testnet)
    pub chain_id: u64,

    /// RPC endpoint; falls back to the chain's public endpoint when unset
    pub rpc_url: Option<String>,

    /// Per-request timeout for JSON-RPC calls
    pub request_timeout_secs: u64,

    // ========== Trade Settings ==========
    /// Slippage tolerance in basis points (50 = 0.5%)
    pub slippage_bps: i64,

    /// Seconds until a swap expires
    pub deadline_secs: i64,

    /// Default recipient of swap output
    pub recipient: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Build a config from any key lookup, falling back to defaults for
    /// missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            chain_id: lookup("CHAIN_ID")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.chain_id),
            rpc_url: lookup("RPC_URL").filter(|s| !s.trim().is_empty()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            slippage_bps: lookup("SLIPPAGE_BPS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.slippage_bps),
            deadline_secs: lookup("DEADLINE_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.deadline_secs),
            recipient: lookup("RECIPIENT").filter(|s| !s.trim().is_empty()),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn chain(&self) -> Result<ChainId> {
        Ok(ChainId::try_from(self.chain_id)?)
    }

    /// Configured RPC URL, or the public endpoint for the configured chain
    pub fn rpc_url_for_chain(&self) -> Result<String> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => Ok(self.chain()?.default_rpc_url().to_string()),
        }
    }

    /// Router options from the configured slippage, deadline and recipient.
    /// An explicit recipient overrides the configured one.
    pub fn trade_options(&self, recipient: Option<&str>) -> Result<TradeOptions> {
        let recipient = recipient
            .map(str::to_string)
            .or_else(|| self.recipient.clone())
            .ok_or_else(|| eyre::eyre!("No recipient - pass --recipient or set RECIPIENT"))?;
        Ok(TradeOptions {
            slippage_bps: self.slippage_bps,
            deadline_seconds: self.deadline_secs,
            recipient,
        })
    }

    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        self.chain()?;

        if let Some(url) = &self.rpc_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(eyre::eyre!("Invalid RPC_URL - expected an http(s) URL, got {}", url));
            }
        }

        if self.slippage_bps < 0 {
            return Err(eyre::eyre!("SLIPPAGE_BPS must not be negative (currently {})", self.slippage_bps));
        }
        if self.deadline_secs <= 0 {
            return Err(eyre::eyre!("DEADLINE_SECS must be positive (currently {})", self.deadline_secs));
        }
        if self.request_timeout_secs == 0 {
            return Err(eyre::eyre!("REQUEST_TIMEOUT_SECS must be positive"));
        }
        if let Some(recipient) = &self.recipient {
            validate_and_parse_address(recipient)?;
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let chain = match self.chain() {
            Ok(chain) => chain.to_string(),
            Err(_) => format!("unsupported ({})", self.chain_id),
        };
        let rpc = self.rpc_url_for_chain().unwrap_or_else(|_| "-".to_string());

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              TRIAD SDK - CONFIGURATION                     ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain:             {:^40} ║", chain);
        println!("║ RPC:               {:^40} ║", truncate(&rpc, 40));
        println!("║ Request Timeout:   {:>38} s ║", self.request_timeout_secs);
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ TRADE DEFAULTS                                             ║");
        println!("║ • Slippage:        {:>38.2}% ║", self.slippage_bps as f64 / 100.0);
        println!("║ • Deadline:        {:>38} s ║", self.deadline_secs);
        println!(
            "║ • Recipient:       {:^40} ║",
            if self.recipient.is_some() { "✓ Configured" } else { "✗ Not Set" }
        );
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{}...", head)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            rpc_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
            recipient: None,
        }
    }
}

// ============================================
// TESTS
// ============================================
