use crate::output::read_report;
use crate::utils::config::REPORT_SCHEMA_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Reference time: {}", report.reference_time);
    println!("  Total users: {}", report.summary.total_users);
    println!("  Growth rate: {:+.1}%", report.summary.growth_rate);
    println!("  Months: {}", report.registrations_by_month.len());

    if report.version != REPORT_SCHEMA_VERSION {
        log::warn!(
            "Report schema v{} differs from current v{}",
            report.version,
            REPORT_SCHEMA_VERSION
        );
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Market Admin Analytics Report Schema");
    println!("Current Version: {}", REPORT_SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string                - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string           - ISO 8601 timestamp");
        println!("  reference_time: string         - 'now' used for the growth windows");
        println!("  summary: object");
        println!("    total_users: number");
        println!("    pro_users: number");
        println!("    standard_users: number");
        println!("    new_users_this_month: number - Created in the last 30 days");
        println!("    previous_month_users: number - Created 30 to 60 days ago");
        println!("    growth_rate: number          - Percent change, one decimal");
        println!("  distribution: object           - Pro/standard counts and percentages");
        println!("  registrations_by_month: array  - {{year, month, label, count}}, first-seen order");
        println!("  timeline: array                - Last 6 months, oldest first");
        println!("  top_users: array               - {{id, display_name, email?, is_pro}}");
        println!("  users: array?                  - Merged users (with --include-users)");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Market Admin v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_SCHEMA_VERSION);
    println!();
    println!("User analytics for the marketplace admin console.");
}
