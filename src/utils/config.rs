//! Configuration and constants for the CLI.

use std::time::Duration;

/// Default timeout for backend requests
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Current report schema version
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Both upstream sources cap a listing at this many rows
pub const MAX_FETCH_LIMIT: usize = 1000;

// Growth is measured over two consecutive windows of this length
pub const GROWTH_WINDOW_DAYS: i64 = 30;

/// Number of months shown on the registration timeline
pub const TIMELINE_MONTHS: usize = 6;

/// Number of users listed under "top users"
pub const TOP_USERS_COUNT: usize = 5;

/// REST path of the profile table
pub const PROFILES_PATH: &str = "/rest/v1/profiles";

/// Admin path of the identity provider's user listing
pub const ACCOUNTS_PATH: &str = "/auth/v1/admin/users";

// Field names for account parsing (exports and API versions disagree on naming)
pub const CREATED_AT_FIELD_NAMES: &[&str] = &["created_at", "createdAt", "inserted_at"];
pub const ID_FIELD_NAMES: &[&str] = &["id", "user_id", "uid"];
pub const ACCOUNT_LIST_FIELD_NAMES: &[&str] = &["users", "data", "accounts"];
