//! Trip Settlement Engine CLI
//!
//! Command-line interface for settling shared trip expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- participants.csv expenses.csv > settlement.csv
//! cargo run -- --strategy sync participants.csv expenses.csv > settlement.csv
//! cargo run -- --format json --currency EUR participants.csv expenses.csv > reports.json
//! cargo run -- --lenient --log-level info participants.csv expenses.csv
//! ```
//!
//! The program groups rows by trip, settles every trip and writes the
//! settlement payments (or full JSON reports) to stdout. Diagnostics go to
//! stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (individual trips may still have been rejected and logged)
//! - 1: Error (missing arguments, file not found, output not writable, etc.)

use std::process;
use trip_settlement_engine::cli;
use trip_settlement_engine::strategy;

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "trip_settlement_engine={level}",
            level = args.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, args.to_options(), config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.to_input(), &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
