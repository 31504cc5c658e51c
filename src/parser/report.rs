//! Assemble an `AnalyticsReport` from aggregation results.

use super::schema::AnalyticsReport;
use crate::aggregator::{tier_distribution, top_users, LabelLocale, MergedUser, MonthHistogram};
use crate::parser::schema::UserSummary;
use crate::utils::config::{REPORT_SCHEMA_VERSION, TIMELINE_MONTHS, TOP_USERS_COUNT};
use chrono::{DateTime, SecondsFormat, Utc};

/// Presentation options for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub locale: LabelLocale,
    pub timeline_months: usize,
    pub top_users: usize,

    /// Embed the full merged user list
    pub include_users: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            locale: LabelLocale::default(),
            timeline_months: TIMELINE_MONTHS,
            top_users: TOP_USERS_COUNT,
            include_users: false,
        }
    }
}

/// Convert aggregation results into the output report
///
/// **Public** - last step before writing
pub fn to_report(
    users: &[MergedUser],
    summary: UserSummary,
    histogram: &MonthHistogram,
    now: DateTime<Utc>,
    options: &ReportOptions,
) -> AnalyticsReport {
    AnalyticsReport {
        version: REPORT_SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        reference_time: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        summary,
        distribution: tier_distribution(&summary),
        registrations_by_month: histogram
            .buckets()
            .iter()
            .map(|b| b.to_entry(options.locale))
            .collect(),
        timeline: histogram
            .recent(options.timeline_months)
            .iter()
            .map(|b| b.to_entry(options.locale))
            .collect(),
        top_users: top_users(users, options.top_users),
        users: options.include_users.then(|| users.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{histogram_by_month, merge, summarize};
    use crate::parser::{Account, Profile};
    use chrono::TimeZone;

    #[test]
    fn test_to_report_shapes() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let profiles = vec![Profile::new("1").with_pro(true), Profile::new("2")];
        let accounts = vec![Account::new("1", Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single())];

        let users = merge(&profiles, &accounts);
        let summary = summarize(&users, now);
        let histogram = histogram_by_month(&users);
        let options = ReportOptions {
            locale: LabelLocale::En,
            ..Default::default()
        };

        let report = to_report(&users, summary, &histogram, now, &options);

        assert_eq!(report.version, REPORT_SCHEMA_VERSION);
        assert_eq!(report.reference_time, "2024-06-15T00:00:00Z");
        assert_eq!(report.registrations_by_month.len(), 1);
        assert_eq!(report.registrations_by_month[0].label, "June 2024");
        assert_eq!(report.timeline, report.registrations_by_month);
        assert_eq!(report.distribution.pro, 1);
        assert_eq!(report.top_users.len(), 2);
        assert!(report.users.is_none());
    }

    #[test]
    fn test_to_report_includes_users_on_request() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let users = merge(&[Profile::new("1")], &[]);
        let options = ReportOptions {
            include_users: true,
            ..Default::default()
        };

        let report = to_report(&users, summarize(&users, now), &histogram_by_month(&users), now, &options);
        assert_eq!(report.users.as_ref().map(Vec::len), Some(1));
        assert!(report.timeline.is_empty());
    }
}
