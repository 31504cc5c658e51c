use chrono::{DateTime, Duration, TimeZone, Utc};
use market_admin::aggregator::{histogram_by_month, merge, summarize, growth_rate, MergedUser, MonthKey};
use market_admin::parser::{Account, Profile};
use pretty_assertions::assert_eq;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn days_ago(days: i64) -> Option<DateTime<Utc>> {
    Some(now() - Duration::days(days))
}

fn sample_profiles() -> Vec<Profile> {
    (1..=6)
        .map(|i| Profile::new(i.to_string()).with_pro(i % 3 == 0))
        .collect()
}

fn sample_accounts() -> Vec<Account> {
    vec![
        Account::new("1", days_ago(2)),
        Account::new("2", days_ago(31)),
        Account::new("3", days_ago(45)),
        Account::new("4", None),
        Account::new("5", days_ago(10)),
        Account::new("99", days_ago(1)),
    ]
}

#[test]
fn test_merge_one_entry_per_profile_in_order() {
    let profiles = sample_profiles();
    let merged = merge(&profiles, &sample_accounts());

    assert_eq!(merged.len(), profiles.len());
    for (user, profile) in merged.iter().zip(&profiles) {
        assert_eq!(user.id(), profile.id);
    }
}

#[test]
fn test_unused_accounts_have_no_effect() {
    let profiles = sample_profiles();
    let mut accounts = sample_accounts();
    let with_extra = merge(&profiles, &accounts);

    accounts.retain(|a| a.id != "99");
    let without_extra = merge(&profiles, &accounts);

    assert_eq!(with_extra, without_extra);
    assert!(with_extra.iter().all(|u| u.id() != "99"));
}

#[test]
fn test_summarize_is_order_independent() {
    let merged = merge(&sample_profiles(), &sample_accounts());
    let mut reversed = merged.clone();
    reversed.reverse();
    let mut rotated = merged.clone();
    rotated.rotate_left(2);

    let expected = summarize(&merged, now());
    assert_eq!(summarize(&reversed, now()), expected);
    assert_eq!(summarize(&rotated, now()), expected);
}

#[test]
fn test_thirty_day_boundary_is_inclusive() {
    let users = merge(&[Profile::new("1")], &[Account::new("1", days_ago(30))]);
    let summary = summarize(&users, now());

    assert_eq!(summary.new_users_this_month, 1);
    assert_eq!(summary.previous_month_users, 0);
}

#[test]
fn test_growth_rate_rules() {
    assert_eq!(growth_rate(5, 0), 100.0);
    assert_eq!(growth_rate(0, 0), 0.0);
    assert_eq!(growth_rate(7, 4), 75.0);
    assert_eq!(growth_rate(2, 6), -66.7);
    assert_eq!(growth_rate(4, 3), 33.3);
}

#[test]
fn test_growth_rate_from_windows() {
    // 2 new (2 and 10 days ago), 2 previous (31 and 45 days ago)
    let summary = summarize(&merge(&sample_profiles(), &sample_accounts()), now());

    assert_eq!(summary.total_users, 6);
    assert_eq!(summary.pro_users, 2);
    assert_eq!(summary.standard_users, 4);
    assert_eq!(summary.new_users_this_month, 2);
    assert_eq!(summary.previous_month_users, 2);
    assert_eq!(summary.growth_rate, 0.0);
}

#[test]
fn test_end_to_end_example() {
    let profiles = vec![Profile::new("1").with_pro(true), Profile::new("2").with_pro(false)];
    let accounts = vec![Account::new("1", days_ago(10))];

    let merged = merge(&profiles, &accounts);

    assert_eq!(
        merged,
        vec![
            MergedUser {
                profile: Profile::new("1").with_pro(true),
                created_at: days_ago(10),
                email: None,
            },
            MergedUser {
                profile: Profile::new("2"),
                created_at: None,
                email: None,
            },
        ]
    );

    let summary = summarize(&merged, now());
    assert_eq!(summary.total_users, 2);
    assert_eq!(summary.pro_users, 1);
    assert_eq!(summary.standard_users, 1);
    assert_eq!(summary.new_users_this_month, 1);
    assert_eq!(summary.previous_month_users, 0);
    assert_eq!(summary.growth_rate, 100.0);

    let histogram = histogram_by_month(&merged);
    assert_eq!(histogram.len(), 1);
    assert_eq!(histogram.buckets()[0].key, MonthKey::new(2024, 6));
    assert_eq!(histogram.buckets()[0].count, 1);
}

#[test]
fn test_merge_and_summarize_are_idempotent() {
    let first = merge(&sample_profiles(), &sample_accounts());
    let second = merge(&sample_profiles(), &sample_accounts());
    assert_eq!(first, second);

    let a = summarize(&first, now());
    let b = summarize(&second, now());
    assert_eq!(a, b);
    assert_eq!(a.growth_rate.to_bits(), b.growth_rate.to_bits());
}

#[test]
fn test_empty_inputs_give_degenerate_output() {
    let merged = merge(&[], &[]);
    let summary = summarize(&merged, now());

    assert_eq!(summary.total_users, 0);
    assert_eq!(summary.growth_rate, 0.0);
    assert!(histogram_by_month(&merged).is_empty());
}
