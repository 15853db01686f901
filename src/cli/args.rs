use crate::core::{EngineConfig, ValidationMode};
use crate::strategy::{BatchConfig, SettlementOptions, TripInput};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Split shared trip expenses and settle the resulting debts
#[derive(Parser, Debug)]
#[command(name = "trip-settlement")]
#[command(about = "Split shared trip expenses and settle the resulting debts", long_about = None)]
pub struct CliArgs {
    /// Participants CSV file path (trip,id,name)
    #[arg(value_name = "PARTICIPANTS", help = "Path to the participants CSV file")]
    pub participants_file: PathBuf,

    /// Expenses CSV file path (trip,id,paid_by,amount,split_type,split_details)
    #[arg(value_name = "EXPENSES", help = "Path to the expenses CSV file")]
    pub expenses_file: PathBuf,

    /// Processing strategy to use
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for concurrent trips"
    )]
    pub strategy: StrategyType,

    /// Output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "csv",
        help = "Output format: 'csv' for settlement rows or 'json' for full trip reports"
    )]
    pub format: OutputFormat,

    /// Currency code copied into every report summary
    #[arg(
        long = "currency",
        value_name = "CODE",
        env = "SETTLEMENT_CURRENCY",
        default_value = "INR"
    )]
    pub currency: String,

    /// Log split detail problems as warnings instead of rejecting the trip
    #[arg(long = "lenient")]
    pub lenient: bool,

    /// Fractional digits of the minor currency unit
    #[arg(long = "scale", value_name = "DIGITS", default_value_t = 2)]
    pub scale: u32,

    /// Number of CSV rows per read batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of CSV rows per read batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of trips settled concurrently (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of trips settled concurrently (default: CPU cores)"
    )]
    pub max_concurrent_trips: Option<usize>,

    /// Log level for diagnostics written to stderr
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        env = "SETTLEMENT_LOG",
        default_value = "warn"
    )]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available output formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are rejected by
    /// [`BatchConfig::new`] with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_trips.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_trips
                    .unwrap_or(default.max_concurrent_trips),
            )
        } else {
            BatchConfig::default()
        }
    }

    pub fn to_engine_config(&self) -> EngineConfig {
        let validation = if self.lenient {
            ValidationMode::Lenient
        } else {
            ValidationMode::Strict
        };
        EngineConfig::new(self.scale, validation)
    }

    pub fn to_options(&self) -> SettlementOptions {
        SettlementOptions {
            engine: self.to_engine_config(),
            currency: self.currency.clone(),
            format: self.format,
        }
    }

    pub fn to_input(&self) -> TripInput {
        TripInput {
            participants: self.participants_file.clone(),
            expenses: self.expenses_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "p.csv", "e.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "p.csv", "e.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "p.csv", "e.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::default_format(&["program", "p.csv", "e.csv"], OutputFormat::Csv)]
    #[case::json(&["program", "--format", "json", "p.csv", "e.csv"], OutputFormat::Json)]
    fn test_format_parsing(#[case] args: &[&str], #[case] expected: OutputFormat) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.format, expected);
    }

    #[test]
    fn test_input_paths() {
        let parsed = CliArgs::try_parse_from(["program", "people.csv", "spend.csv"]).unwrap();
        let input = parsed.to_input();

        assert_eq!(input.participants, PathBuf::from("people.csv"));
        assert_eq!(input.expenses, PathBuf::from("spend.csv"));
    }

    #[rstest]
    #[case::defaults(&["program", "p.csv", "e.csv"], 2, ValidationMode::Strict)]
    #[case::lenient(&["program", "--lenient", "p.csv", "e.csv"], 2, ValidationMode::Lenient)]
    #[case::custom_scale(&["program", "--scale", "3", "p.csv", "e.csv"], 3, ValidationMode::Strict)]
    #[case::scale_out_of_range(&["program", "--scale", "40", "p.csv", "e.csv"], 2, ValidationMode::Strict)]
    fn test_engine_config_conversion(
        #[case] args: &[&str],
        #[case] scale: u32,
        #[case] validation: ValidationMode,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_engine_config();

        assert_eq!(config.scale, scale);
        assert_eq!(config.validation, validation);
    }

    #[test]
    fn test_options_carry_currency_and_format() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--currency",
            "EUR",
            "--format",
            "json",
            "p.csv",
            "e.csv",
        ])
        .unwrap();
        let options = parsed.to_options();

        assert_eq!(options.currency, "EUR");
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[rstest]
    #[case::all_defaults(&["program", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "p.csv", "e.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "p.csv", "e.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "p.csv", "e.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent_trips, expected_max_concurrent);
    }

    #[rstest]
    #[case::missing_inputs(&["program"])]
    #[case::missing_expenses(&["program", "p.csv"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "p.csv", "e.csv"])]
    #[case::invalid_format(&["program", "--format", "xml", "p.csv", "e.csv"])]
    #[case::negative_scale(&["program", "--scale", "-1", "p.csv", "e.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}
