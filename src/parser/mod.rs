//! Record parsing and schema definitions.
//!
//! This module handles:
//! - Coercing raw backend JSON into typed profiles and accounts
//! - Lenient timestamp parsing
//! - Defining the report schema and assembling reports

pub mod records;
pub mod report;
pub mod schema;

// Re-export main types
pub use records::{load_payload, parse_accounts, parse_profiles, parse_timestamp, Account, Profile};
pub use report::{to_report, ReportOptions};
pub use schema::{AnalyticsReport, MonthEntry, TierDistribution, TopUser, UserSummary};
