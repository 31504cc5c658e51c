//! Output JSON schema definitions for analytics reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::MergedUser;
use serde::{Deserialize, Serialize};

/// Top-level analytics report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// The "now" every time window was measured from
    pub reference_time: String,

    /// Headline counts and growth
    pub summary: UserSummary,

    /// Pro vs standard split
    pub distribution: TierDistribution,

    /// Registrations per calendar month, in first-seen order
    pub registrations_by_month: Vec<MonthEntry>,

    /// Most recent months, oldest first
    pub timeline: Vec<MonthEntry>,

    pub top_users: Vec<TopUser>,

    /// Full merged user list (only when requested)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<MergedUser>>,
}

/// Summary counts over the merged user set
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UserSummary {
    pub total_users: usize,
    pub pro_users: usize,
    pub standard_users: usize,

    /// Created within the last 30 days (inclusive)
    pub new_users_this_month: usize,

    /// Created in the 30 days before that
    pub previous_month_users: usize,

    /// Percentage change between the two windows, one decimal
    pub growth_rate: f64,
}

/// Pro vs standard distribution
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TierDistribution {
    pub pro: usize,
    pub standard: usize,
    pub pro_percentage: f64,
    pub standard_percentage: f64,
}

/// One month of registrations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthEntry {
    pub year: i32,
    pub month: u32,

    /// Localized "month year" label
    pub label: String,

    pub count: usize,
}

/// A user highlighted on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopUser {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_pro: bool,
}
