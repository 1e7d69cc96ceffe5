//! triad - command-line client for 3Swap triads
//!
//! Run with: cargo run -- <command>
//!
//! Commands:
//! - `address` derives a triad address without touching the network
//! - `token` / `triad` read token metadata and reserves over JSON-RPC
//! - `swap` prints router call parameters for a quoted trade

use alloy_primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use console::style;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use triad_sdk::config::Config;
use triad_sdk::{
    validate_and_parse_address, ChainId, EthCaller, Fetcher, JsonRpcTransport, ProviderTransport, Router, Token,
    TokenAmount, Trade, TradeType, Triad,
};

#[derive(Parser, Debug)]
#[command(name = "triad")]
#[command(version, about = "Client for three-asset 3Swap pools", long_about = None)]
struct Cli {
    /// Chain ID (overrides CHAIN_ID)
    #[arg(long, global = true)]
    chain: Option<u64>,

    /// JSON-RPC endpoint (overrides RPC_URL)
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Load configuration from a TOML file instead of the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read through an alloy provider instead of raw JSON-RPC
    #[arg(long, global = true)]
    provider: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive the triad address for three tokens (offline)
    Address(TriadArgs),

    /// Fetch decimals, name and symbol of a token
    Token {
        /// Token contract address
        address: String,
    },

    /// Fetch a triad's tokens and reserves
    Triad(TriadArgs),

    /// Build router call parameters for a trade
    Swap(SwapArgs),

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug)]
struct TriadArgs {
    token_a: String,
    token_b: String,
    token_c: String,
}

#[derive(Args, Debug)]
struct SwapArgs {
    /// First input leg as ADDRESS:RAW_AMOUNT
    #[arg(long)]
    in1: String,

    /// Second input leg as ADDRESS:RAW_AMOUNT
    #[arg(long)]
    in2: String,

    /// Output leg as ADDRESS:RAW_AMOUNT
    #[arg(long)]
    out: String,

    /// The output amount is fixed and the inputs are quotes
    #[arg(long)]
    exact_output: bool,

    /// Slippage tolerance in basis points (overrides SLIPPAGE_BPS)
    #[arg(long)]
    slippage_bps: Option<i64>,

    /// Seconds until the swap expires (overrides DEADLINE_SECS)
    #[arg(long)]
    deadline_secs: Option<i64>,

    /// Recipient of the output (overrides RECIPIENT)
    #[arg(long)]
    recipient: Option<String>,
}

fn print_banner() {
    println!();
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!("{}", style(" △ TRIAD - 3Swap three-asset pool client").cyan().bold());
    println!(
        "{}",
        style("═══════════════════════════════════════════════════════════════").cyan()
    );
    println!();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(chain) = cli.chain {
        config.chain_id = chain;
    }
    if let Some(url) = &cli.rpc_url {
        config.rpc_url = Some(url.clone());
    }
    Ok(config)
}

fn fetcher_for(config: &Config, use_provider: bool) -> Result<Fetcher<'static, Box<dyn EthCaller>>> {
    let url = config.rpc_url_for_chain()?;
    let caller: Box<dyn EthCaller> = if use_provider {
        info!("Using alloy provider at {}", url);
        Box::new(ProviderTransport::new(url))
    } else {
        info!("Using JSON-RPC endpoint {}", url);
        Box::new(JsonRpcTransport::with_timeout(
            url,
            Duration::from_secs(config.request_timeout_secs),
        )?)
    };
    Ok(Fetcher::new(caller))
}

/// Parse `ADDRESS:RAW_AMOUNT`
fn parse_leg(leg: &str) -> Result<(Address, U256)> {
    let (address, amount) = leg
        .split_once(':')
        .ok_or_else(|| eyre!("Expected ADDRESS:AMOUNT, got {}", leg))?;
    let address = validate_and_parse_address(address)?;
    let amount: U256 = amount
        .trim()
        .parse()
        .map_err(|e| eyre!("Invalid amount {}: {}", amount, e))?;
    Ok((address, amount))
}

fn print_triad(triad: &Triad) {
    println!("{} Triad {}", style("✓").green(), style(triad.address()).bold());
    println!("   Chain:  {}", triad.chain_id());
    for (i, reserve) in triad.reserves().iter().enumerate() {
        println!(
            "   token{}: {} ({}) reserve {}",
            i,
            reserve.token().symbol(),
            reserve.token().address(),
            reserve
        );
    }
}

fn run_address(chain: ChainId, args: &TriadArgs) -> Result<()> {
    let tokens = [&args.token_a, &args.token_b, &args.token_c]
        .into_iter()
        .map(|raw| -> Result<Token> { Ok(Token::new(validate_and_parse_address(raw)?, chain, 18, "", "")) })
        .collect::<Result<Vec<_>>>()?;

    let address = Triad::get_address(&tokens[0], &tokens[1], &tokens[2], chain)?;
    println!("{} {}", style("✓").green(), style(address).bold());
    println!("   Factory: {}", chain.factory());
    Ok(())
}

async fn run_token(config: &Config, use_provider: bool, chain: ChainId, raw: &str) -> Result<()> {
    let address = validate_and_parse_address(raw)?;
    let fetcher = fetcher_for(config, use_provider)?;

    let start = Instant::now();
    let token = fetcher.fetch_token_data(chain, address).await?;
    println!("{} Fetched in {:?}", style("✓").green(), start.elapsed());
    println!("   Address:  {}", token.address());
    println!("   Name:     {}", token.name());
    println!("   Symbol:   {}", token.symbol());
    println!("   Decimals: {}", token.decimals());
    Ok(())
}

async fn run_triad(config: &Config, use_provider: bool, chain: ChainId, args: &TriadArgs) -> Result<()> {
    let addresses = [
        validate_and_parse_address(&args.token_a)?,
        validate_and_parse_address(&args.token_b)?,
        validate_and_parse_address(&args.token_c)?,
    ];
    let fetcher = fetcher_for(config, use_provider)?;

    let start = Instant::now();
    let [a, b, c] = fetcher.fetch_tokens(chain, addresses).await?;
    let triad = fetcher.fetch_triad_data(&a, &b, &c).await?;
    println!("{} Fetched in {:?}", style("✓").green(), start.elapsed());
    print_triad(&triad);
    Ok(())
}

async fn run_swap(config: &Config, use_provider: bool, chain: ChainId, args: &SwapArgs) -> Result<()> {
    let legs = [parse_leg(&args.in1)?, parse_leg(&args.in2)?, parse_leg(&args.out)?];
    let fetcher = fetcher_for(config, use_provider)?;
    let tokens = fetcher.fetch_tokens(chain, [legs[0].0, legs[1].0, legs[2].0]).await?;

    let [t1, t2, t3] = tokens;
    let trade_type = if args.exact_output {
        TradeType::ExactOutput
    } else {
        TradeType::ExactInput
    };
    let trade = Trade::new(
        TokenAmount::new(legs[0].1, t1),
        TokenAmount::new(legs[1].1, t2),
        TokenAmount::new(legs[2].1, t3),
        trade_type,
    )?;

    let mut options = config.trade_options(args.recipient.as_deref())?;
    if let Some(bps) = args.slippage_bps {
        options.slippage_bps = bps;
    }
    if let Some(secs) = args.deadline_secs {
        options.deadline_seconds = secs;
    }

    let [max_in1, max_in2] = trade.max_amounts_in(options.slippage_bps)?;
    let min_out = trade.min_amount_out(options.slippage_bps)?;
    println!("{} {} trade", style("✓").green(), trade.trade_type());
    println!("   Max in:  {} + {}", max_in1, max_in2);
    println!("   Min out: {}", min_out);
    println!();

    let params = Router::swap_call_parameters(&trade, chain, &options)?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("triad_sdk=info".parse()?))
        .init();

    let cli = Cli::parse();
    print_banner();

    let config = load_config(&cli)?;
    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        error!("Please check your .env file or --config");
        return Err(e);
    }
    let chain = config.chain()?;

    match &cli.command {
        Commands::Address(args) => run_address(chain, args),
        Commands::Token { address } => run_token(&config, cli.provider, chain, address).await,
        Commands::Triad(args) => run_triad(&config, cli.provider, chain, args).await,
        Commands::Swap(args) => run_swap(&config, cli.provider, chain, args).await,
        Commands::Config => {
            config.print_summary();
            Ok(())
        }
    }
}
