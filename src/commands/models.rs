use crate::aggregator::LabelLocale;
use crate::utils::config::MAX_FETCH_LIMIT;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Backend base URL (needed unless both inputs come from files)
    pub backend_url: Option<String>,

    /// Service key sent as `apikey` and bearer token
    pub service_key: Option<String>,

    /// Local profile export, used instead of the profile store
    pub profiles_file: Option<PathBuf>,

    /// Local account export, used instead of the identity provider
    pub accounts_file: Option<PathBuf>,

    /// Output path for JSON report
    pub output_json: PathBuf,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Embed the merged user list in the report
    pub include_users: bool,

    pub locale: LabelLocale,

    /// Reference time for growth windows (None = current time)
    pub now: Option<DateTime<Utc>>,

    /// Fail instead of continuing with an empty collection
    pub strict: bool,

    /// Maximum rows fetched per source
    pub limit: usize,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            backend_url: None,
            service_key: None,
            profiles_file: None,
            accounts_file: None,
            output_json: PathBuf::from("analytics.json"),
            print_summary: false,
            include_users: false,
            locale: LabelLocale::default(),
            now: None,
            strict: false,
            limit: MAX_FETCH_LIMIT,
        }
    }
}

impl AnalyzeArgs {
    /// True when at least one input has to come from the backend
    pub fn needs_backend(&self) -> bool {
        self.profiles_file.is_none() || self.accounts_file.is_none()
    }
}
