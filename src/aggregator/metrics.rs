//! Summary metrics over merged users.
//!
//! Every time window is measured from a caller-supplied `now`, so the same
//! inputs always produce the same numbers.

use super::merge::MergedUser;
use crate::parser::schema::{TierDistribution, TopUser, UserSummary};
use crate::utils::config::GROWTH_WINDOW_DAYS;
use chrono::{DateTime, Duration, Utc};
use log::debug;

/// Compute headline counts and the growth rate
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `users` - Merged users, in any order
/// * `now` - Reference time for the 30/60 day windows
///
/// # Returns
/// Summary counts; users with unknown creation time only count in totals
pub fn summarize(users: &[MergedUser], now: DateTime<Utc>) -> UserSummary {
    let current_start = now - Duration::days(GROWTH_WINDOW_DAYS);
    let previous_start = now - Duration::days(GROWTH_WINDOW_DAYS * 2);

    let total_users = users.len();
    let pro_users = users.iter().filter(|u| u.is_pro()).count();

    let mut new_users_this_month = 0;
    let mut previous_month_users = 0;

    for created_at in users.iter().filter_map(|u| u.created_at) {
        if created_at >= current_start {
            new_users_this_month += 1;
        } else if created_at >= previous_start {
            previous_month_users += 1;
        }
    }

    let summary = UserSummary {
        total_users,
        pro_users,
        standard_users: total_users - pro_users,
        new_users_this_month,
        previous_month_users,
        growth_rate: growth_rate(new_users_this_month, previous_month_users),
    };

    debug!("User summary: {}", summary.describe());
    summary
}

/// Percentage change between two registration windows
///
/// **Public** - exposed so the policy can be checked on its own
///
/// With no registrations in the previous window the rate is 100 when the
/// current window has any, and 0 otherwise.
pub fn growth_rate(current: usize, previous: usize) -> f64 {
    if previous > 0 {
        let change = (current as f64 - previous as f64) / previous as f64 * 100.0;
        round_one_decimal(change)
    } else if current > 0 {
        100.0
    } else {
        0.0
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Pro vs standard split with percentages of the total
pub fn tier_distribution(summary: &UserSummary) -> TierDistribution {
    let percentage = |count: usize| {
        if summary.total_users > 0 {
            count as f64 / summary.total_users as f64 * 100.0
        } else {
            0.0
        }
    };

    TierDistribution {
        pro: summary.pro_users,
        standard: summary.standard_users,
        pro_percentage: percentage(summary.pro_users),
        standard_percentage: percentage(summary.standard_users),
    }
}

/// First `n` merged users, as shown in the dashboard's top list
pub fn top_users(users: &[MergedUser], n: usize) -> Vec<TopUser> {
    users
        .iter()
        .take(n)
        .map(|u| TopUser {
            id: u.id().to_string(),
            display_name: u.profile.display_name().unwrap_or_else(|| u.id().to_string()),
            email: u.email.clone(),
            is_pro: u.is_pro(),
        })
        .collect()
}

impl UserSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn describe(&self) -> String {
        format!(
            "Total: {} | Pro: {} | Standard: {} | New (30d): {} | Previous (30d): {} | Growth: {:+.1}%",
            self.total_users,
            self.pro_users,
            self.standard_users,
            self.new_users_this_month,
            self.previous_month_users,
            self.growth_rate
        )
    }
}
