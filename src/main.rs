//! Market Admin CLI
//!
//! Fetches profiles and accounts from the hosted backend (or local exports)
//! and writes a user analytics report.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use market_admin::aggregator::LabelLocale;
use market_admin::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use market_admin::utils::config::MAX_FETCH_LIMIT;

/// Market Admin - user analytics for the marketplace console
#[derive(Parser, Debug)]
#[command(name = "market-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge profiles with accounts and write an analytics report
    Analyze {
        /// Backend base URL
        #[arg(short, long, env = "MARKET_ADMIN_URL")]
        url: Option<String>,

        /// Service key for the profile store and identity provider
        #[arg(short, long, env = "MARKET_ADMIN_SERVICE_KEY", hide_env_values = true)]
        key: Option<String>,

        /// Read profiles from a local JSON export instead of the backend
        #[arg(long)]
        profiles: Option<PathBuf>,

        /// Read accounts from a local JSON export instead of the backend
        #[arg(long)]
        accounts: Option<PathBuf>,

        /// Output path for JSON report
        #[arg(short, long, default_value = "analytics.json")]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,

        /// Include the merged user list in the report
        #[arg(long)]
        include_users: bool,

        /// Locale for month labels
        #[arg(long, value_enum, default_value_t = LabelLocale::Fr)]
        locale: LabelLocale,

        /// Reference time (RFC 3339) for the growth windows, defaults to now
        #[arg(long, value_parser = parse_reference_time)]
        now: Option<DateTime<Utc>>,

        /// Fail if a source cannot be loaded instead of treating it as empty
        #[arg(long)]
        strict: bool,

        /// Maximum rows fetched per source
        #[arg(long, default_value_t = MAX_FETCH_LIMIT)]
        limit: usize,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn parse_reference_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 timestamp '{}': {}", value, e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Analyze {
            url,
            key,
            profiles,
            accounts,
            output,
            summary,
            include_users,
            locale,
            now,
            strict,
            limit,
        } => {
            let args = AnalyzeArgs {
                backend_url: url,
                service_key: key,
                profiles_file: profiles,
                accounts_file: accounts,
                output_json: output,
                print_summary: summary,
                include_users,
                locale,
                now,
                strict,
                limit,
            };

            validate_args(&args)?;
            execute_analyze(args).context("Analysis failed")?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
