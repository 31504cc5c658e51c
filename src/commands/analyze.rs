//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Loads profiles (profile store or local export)
//! 2. Loads accounts (identity provider or local export)
//! 3. Merges them by identifier
//! 4. Computes summary metrics and the monthly histogram
//! 5. Writes the JSON report

use super::models::AnalyzeArgs;
use crate::aggregator::{histogram_by_month, merge, summarize};
use crate::backend::{BackendClient, Collection};
use crate::output::{render_text_summary, write_report};
use crate::parser::schema::AnalyticsReport;
use crate::parser::{load_payload, parse_accounts, parse_profiles, to_report, Account, Profile, ReportOptions};
use crate::utils::config::MAX_FETCH_LIMIT;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// The report that was written
///
/// # Errors
/// * Backend client construction failures
/// * Source failures, only when `strict` is set
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<AnalyticsReport> {
    let start_time = Instant::now();
    let now = args.now.unwrap_or_else(Utc::now);

    info!("Starting user analytics (reference time {})", now.to_rfc3339());

    let client = if args.needs_backend() {
        let url = args.backend_url.as_deref().unwrap_or_default();
        let key = args.service_key.as_deref().unwrap_or_default();
        Some(BackendClient::new(url, key).context("Failed to create backend client")?)
    } else {
        None
    };

    // Step 1: Profiles
    info!("Step 1/5: Loading profiles...");
    let profiles = degrade(
        load_profiles(&args, client.as_ref()),
        Collection::Profiles,
        args.strict,
    )?;

    // Step 2: Accounts
    info!("Step 2/5: Loading accounts...");
    let accounts = degrade(
        load_accounts(&args, client.as_ref()),
        Collection::Accounts,
        args.strict,
    )?;

    debug!("Loaded {} profiles and {} accounts", profiles.len(), accounts.len());

    // Step 3: Merge
    info!("Step 3/5: Merging profiles with accounts...");
    let users = merge(&profiles, &accounts);

    // Step 4: Metrics
    info!("Step 4/5: Computing metrics...");
    let summary = summarize(&users, now);
    let histogram = histogram_by_month(&users);
    info!("Users: {}", summary.describe());

    // Step 5: Report
    info!("Step 5/5: Writing report...");
    let options = ReportOptions {
        locale: args.locale,
        include_users: args.include_users,
        ..Default::default()
    };
    let report = to_report(&users, summary, &histogram, now, &options);

    write_report(&report, &args.output_json).context("Failed to write analytics report")?;

    info!("✓ Report written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", render_text_summary(&report));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

fn load_profiles(args: &AnalyzeArgs, client: Option<&BackendClient>) -> Result<Vec<Profile>> {
    let raw = match (&args.profiles_file, client) {
        (Some(path), _) => read_source(path)?,
        (None, Some(client)) => client.fetch_profiles(args.limit)?,
        (None, None) => return Err(anyhow!("no profile source configured")),
    };

    Ok(parse_profiles(&raw)?)
}

fn load_accounts(args: &AnalyzeArgs, client: Option<&BackendClient>) -> Result<Vec<Account>> {
    let raw = match (&args.accounts_file, client) {
        (Some(path), _) => read_source(path)?,
        (None, Some(client)) => client.fetch_accounts(args.limit)?,
        (None, None) => return Err(anyhow!("no account source configured")),
    };

    Ok(parse_accounts(&raw)?)
}

fn read_source(path: &Path) -> Result<serde_json::Value> {
    load_payload(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// A failed source yields an empty collection unless running strict
fn degrade<T>(loaded: Result<Vec<T>>, collection: Collection, strict: bool) -> Result<Vec<T>> {
    match loaded {
        Ok(records) => Ok(records),
        Err(e) if strict => Err(e.context(format!("Failed to load {}", collection.name()))),
        Err(e) => {
            warn!(
                "Failed to load {}, continuing with none: {:#}",
                collection.name(),
                e
            );
            Ok(Vec::new())
        }
    }
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.needs_backend() {
        let url = match args.backend_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ => anyhow::bail!(
                "Backend URL is required unless both --profiles and --accounts are given"
            ),
        };

        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("Backend URL must start with http:// or https://");
        }

        if args.service_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            anyhow::bail!("Service key is required when reading from the backend");
        }
    }

    if args.limit == 0 {
        anyhow::bail!("limit must be greater than 0");
    }

    if args.limit > MAX_FETCH_LIMIT {
        anyhow::bail!("limit is too large (max {})", MAX_FETCH_LIMIT);
    }

    crate::output::validate_path(&args.output_json)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn backend_args() -> AnalyzeArgs {
        AnalyzeArgs {
            backend_url: Some("https://abc.example.co".to_string()),
            service_key: Some("service-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_args_backend() {
        assert!(validate_args(&backend_args()).is_ok());
    }

    #[test]
    fn test_validate_args_missing_url() {
        assert!(validate_args(&AnalyzeArgs::default()).is_err());
    }

    #[test]
    fn test_validate_args_invalid_scheme() {
        let args = AnalyzeArgs {
            backend_url: Some("ftp://abc.example.co".to_string()),
            ..backend_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_key() {
        let args = AnalyzeArgs {
            service_key: Some("  ".to_string()),
            ..backend_args()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_files_only() {
        let args = AnalyzeArgs {
            profiles_file: Some(PathBuf::from("profiles.json")),
            accounts_file: Some(PathBuf::from("accounts.json")),
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_limit_bounds() {
        let zero = AnalyzeArgs {
            limit: 0,
            ..backend_args()
        };
        let huge = AnalyzeArgs {
            limit: 5000,
            ..backend_args()
        };
        assert!(validate_args(&zero).is_err());
        assert!(validate_args(&huge).is_err());
    }

    #[test]
    fn test_degrade_lenient_and_strict() {
        let failed: Result<Vec<u8>> = Err(anyhow!("boom"));
        assert!(degrade(failed, Collection::Profiles, false).unwrap().is_empty());

        let failed: Result<Vec<u8>> = Err(anyhow!("boom"));
        assert!(degrade(failed, Collection::Profiles, true).is_err());
    }
}
