//! Aggregation of profiles and accounts into user analytics.
//!
//! This module transforms typed records into:
//! - Merged per-user view (profile + account)
//! - Summary counts and growth rate
//! - Registration histogram by month

pub mod histogram;
pub mod merge;
pub mod metrics;

// Re-export main types and functions
pub use histogram::{histogram_by_month, LabelLocale, MonthBucket, MonthHistogram, MonthKey};
pub use merge::{merge, MergedUser};
pub use metrics::{growth_rate, summarize, tier_distribution, top_users};
