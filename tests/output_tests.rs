use chrono::{TimeZone, Utc};
use market_admin::aggregator::{histogram_by_month, merge, summarize, LabelLocale};
use market_admin::output::{read_report, render_text_summary, validate_path, write_report};
use market_admin::parser::{to_report, Account, AnalyticsReport, Profile, ReportOptions};
use std::path::Path;
use tempfile::NamedTempFile;

fn create_test_report() -> AnalyticsReport {
    let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
    let profiles = vec![
        Profile::new("1").with_pro(true).with_name("Dupont", "Marie"),
        Profile::new("2").with_email("paul@example.com"),
    ];
    let accounts = vec![
        Account::new("1", Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).single()),
        Account::new("2", Utc.with_ymd_and_hms(2024, 4, 20, 8, 0, 0).single()),
    ];

    let users = merge(&profiles, &accounts);
    let options = ReportOptions {
        locale: LabelLocale::En,
        include_users: true,
        ..Default::default()
    };

    to_report(&users, summarize(&users, now), &histogram_by_month(&users), now, &options)
}

#[test]
fn test_write_and_read_report() {
    let report = create_test_report();
    let temp_file = NamedTempFile::new().unwrap();

    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    assert_eq!(loaded, report);
    assert_eq!(loaded.users.map(|u| u.len()), Some(2));
}

#[test]
fn test_report_timeline_is_chronological() {
    let report = create_test_report();
    let labels: Vec<&str> = report.timeline.iter().map(|e| e.label.as_str()).collect();
    let first_seen: Vec<&str> = report
        .registrations_by_month
        .iter()
        .map(|e| e.label.as_str())
        .collect();

    assert_eq!(first_seen, vec!["June 2024", "April 2024"]);
    assert_eq!(labels, vec!["April 2024", "June 2024"]);
}

#[test]
fn test_validate_output_path_empty() {
    assert!(validate_path(Path::new("")).is_err());
}

#[test]
fn test_read_report_rejects_garbage() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();
    assert!(read_report(temp_file.path()).is_err());
}

#[test]
fn test_text_summary_mentions_top_user() {
    let text = render_text_summary(&create_test_report());
    assert!(text.contains("Dupont Marie [Pro]"));
    assert!(text.contains("<paul@example.com>"));
}
