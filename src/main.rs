//! Rust Bank Engine CLI
//!
//! Command-line interface for applying bank account operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > accounts.csv
//! cargo run -- --strategy sync operations.csv > accounts.csv
//! cargo run -- --report ledger operations.csv > ledger.csv
//! cargo run -- --config bank.toml --strategy async --batch-size 2000 --max-concurrent 8 operations.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr and are filtered with
//! `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, file not found, file not readable, etc.)

use rust_bank_engine::cli;
use rust_bank_engine::config::BankConfig;
use rust_bank_engine::strategy;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let bank = match BankConfig::load(args.config_file.as_deref()) {
        Ok(bank) => bank,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let strategy = {
        let batch = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, bank, batch, args.report)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
