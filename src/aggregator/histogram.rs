//! Registration histogram by calendar month.
//!
//! Buckets are keyed by a `(year, month)` pair, not by a display string, so
//! chronological ordering is always available. Labels are only produced at
//! the presentation boundary via `MonthKey::label`.

use super::merge::MergedUser;
use crate::parser::schema::MonthEntry;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use clap::ValueEnum;
use log::debug;
use std::collections::HashMap;

/// Calendar month (UTC) of a registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_datetime(ts: &DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    /// Localized "month year" label, e.g. "janvier 2024"
    pub fn label(&self, locale: LabelLocale) -> String {
        match Utc.with_ymd_and_hms(self.year, self.month, 1, 0, 0, 0).single() {
            Some(first_day) => first_day
                .format_localized("%B %Y", locale.chrono_locale())
                .to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

/// Locale used for month labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LabelLocale {
    En,
    #[default]
    Fr,
}

impl LabelLocale {
    fn chrono_locale(self) -> chrono::Locale {
        match self {
            LabelLocale::En => chrono::Locale::en_US,
            LabelLocale::Fr => chrono::Locale::fr_FR,
        }
    }
}

/// Registrations counted for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub count: usize,
}

impl MonthBucket {
    pub fn to_entry(&self, locale: LabelLocale) -> MonthEntry {
        MonthEntry {
            year: self.key.year,
            month: self.key.month,
            label: self.key.label(locale),
            count: self.count,
        }
    }
}

/// Month buckets in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthHistogram {
    buckets: Vec<MonthBucket>,
}

impl MonthHistogram {
    /// Buckets in the order their first member was encountered
    pub fn buckets(&self) -> &[MonthBucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, key: MonthKey) -> Option<usize> {
        self.buckets.iter().find(|b| b.key == key).map(|b| b.count)
    }

    /// Buckets sorted oldest first
    pub fn chronological(&self) -> Vec<MonthBucket> {
        let mut sorted = self.buckets.clone();
        sorted.sort_by_key(|b| b.key);
        sorted
    }

    /// The `n` most recent months, oldest first
    pub fn recent(&self, n: usize) -> Vec<MonthBucket> {
        let sorted = self.chronological();
        let skip = sorted.len().saturating_sub(n);
        sorted.into_iter().skip(skip).collect()
    }

    /// Total registrations with a known month
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// Group merged users by the calendar month of their creation time
///
/// **Public** - registration histogram for the analytics view
///
/// Users with an unknown creation time are skipped.
pub fn histogram_by_month(users: &[MergedUser]) -> MonthHistogram {
    let mut buckets: Vec<MonthBucket> = Vec::new();
    let mut positions: HashMap<MonthKey, usize> = HashMap::new();

    for created_at in users.iter().filter_map(|u| u.created_at.as_ref()) {
        let key = MonthKey::from_datetime(created_at);
        match positions.get(&key) {
            Some(&pos) => buckets[pos].count += 1,
            None => {
                positions.insert(key, buckets.len());
                buckets.push(MonthBucket { key, count: 1 });
            }
        }
    }

    debug!(
        "Built registration histogram: {} month(s) from {} users",
        buckets.len(),
        users.len()
    );

    MonthHistogram { buckets }
}
