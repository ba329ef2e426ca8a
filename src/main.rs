use amm_arbitrage_scanner::{
    config::ScannerConfig,
    data::ReserveSnapshot,
    providers::{FixedReserveProvider, RpcReserveProvider},
    scanner::Scanner,
    utils::{logger, wei_to_units_signed},
    Result,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "amm-arb")]
#[command(about = "Cross-DEX constant-product arbitrage scanner")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/scanner.toml")]
    config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Log file path
    #[arg(long, default_value = "logs/scanner.log")]
    log_file: PathBuf,

    /// Override the configured base-asset trade amount per buy leg
    #[arg(long)]
    trade_amount: Option<f64>,

    /// Override the configured profit threshold
    #[arg(long)]
    profit_threshold: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the ledger and evaluate one round per new block
    Run,
    /// Evaluate a single round against a snapshot JSON file
    Scan {
        /// Snapshot file mapping exchange names to wei-scale reserves
        snapshot: PathBuf,

        /// Block number to tag the reported opportunities with
        #[arg(long, default_value_t = 0)]
        block: u64,
    },
    /// Validate configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    logger::init(&cli.log_level, &cli.log_file)?;

    info!(
        "Starting AMM Arbitrage Scanner v{}",
        amm_arbitrage_scanner::VERSION
    );

    let mut config = ScannerConfig::from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    if let Some(trade_amount) = cli.trade_amount {
        config.strategy.trade_amount = trade_amount;
    }
    if let Some(profit_threshold) = cli.profit_threshold {
        config.strategy.profit_threshold = profit_threshold;
    }

    match cli.command {
        Commands::Run => run_scanner(config).await,
        Commands::Scan { snapshot, block } => scan_snapshot(config, snapshot, block).await,
        Commands::Validate => validate_config(config),
    }
}

async fn run_scanner(config: ScannerConfig) -> Result<()> {
    config.validate()?;

    let provider = RpcReserveProvider::new(&config.provider, &config.tokens, &config.exchanges)?;
    let mut scanner = Scanner::new(&config, provider)?;

    scanner.run().await
}

async fn scan_snapshot(config: ScannerConfig, snapshot_path: PathBuf, block: u64) -> Result<()> {
    let snapshot = ReserveSnapshot::from_json_file(&snapshot_path)?;
    info!(
        exchanges = snapshot.len(),
        "loaded snapshot from {}",
        snapshot_path.display()
    );

    let provider = FixedReserveProvider::new(snapshot, block);
    let mut scanner = Scanner::new(&config, provider)?;

    let found = scanner.run_round(block).await?;
    for opportunity in &found {
        println!("{}", opportunity);
    }
    println!(
        "{} opportunities, total profit {} {}",
        found.len(),
        wei_to_units_signed(scanner.total_profit()),
        config.tokens.base_symbol
    );

    Ok(())
}

fn validate_config(config: ScannerConfig) -> Result<()> {
    info!("Validating configuration...");

    match config.validate() {
        Ok(_) => {
            info!("Configuration is valid");
            println!("Configuration validation passed!");
            Ok(())
        }
        Err(e) => {
            error!("Configuration validation failed: {}", e);
            Err(e)
        }
    }
}
