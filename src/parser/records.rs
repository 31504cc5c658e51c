//! Typed records coerced from untyped backend JSON.
//!
//! The profile store and the identity provider both hand back loosely typed
//! rows. Everything is validated here, once, so the aggregator only ever sees
//! `Profile` and `Account` values. Individual malformed fields degrade to
//! `None` instead of failing the whole payload.

use crate::utils::config::{ACCOUNT_LIST_FIELD_NAMES, CREATED_AT_FIELD_NAMES, ID_FIELD_NAMES};
use crate::utils::error::ParseError;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application-level user record from the profile store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifier, shared with the matching `Account`
    pub id: String,
    pub email: Option<String>,
    pub telephone: Option<String>,
    /// Family name
    pub nom: Option<String>,
    /// Given name
    pub prenom: Option<String>,
    /// Company
    pub societe: Option<String>,
    pub category: Option<String>,
    pub slug: Option<String>,
    pub avatar_url: Option<String>,
    /// Professional tier (null in the store means standard)
    pub is_pro: bool,
    pub is_admin: bool,
}

impl Profile {
    /// Create a profile with only an identifier set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
            telephone: None,
            nom: None,
            prenom: None,
            societe: None,
            category: None,
            slug: None,
            avatar_url: None,
            is_pro: false,
            is_admin: false,
        }
    }

    pub fn with_pro(mut self, is_pro: bool) -> Self {
        self.is_pro = is_pro;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, nom: impl Into<String>, prenom: impl Into<String>) -> Self {
        self.nom = Some(nom.into());
        self.prenom = Some(prenom.into());
        self
    }

    /// "nom prenom", skipping missing parts
    pub fn display_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.nom.as_deref(), self.prenom.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

/// Identity-provider record, authoritative for creation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    /// `None` when the provider omitted it or sent something unparseable
    pub created_at: Option<DateTime<Utc>>,
    pub email: Option<String>,
}

impl Account {
    pub fn new(id: impl Into<String>, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: id.into(),
            created_at,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Read a raw JSON payload from a local export
///
/// **Public** - used by the analyze command for offline inputs
pub fn load_payload(path: impl AsRef<Path>) -> Result<Value, ParseError> {
    let path = path.as_ref();
    debug!("Reading payload from: {}", path.display());

    let file = File::open(path)?;
    let payload = serde_json::from_reader(BufReader::new(file))?;
    Ok(payload)
}

/// Coerce a profile-store payload into typed profiles
///
/// **Public** - main entry point for profile parsing
///
/// # Arguments
/// * `raw` - JSON array of profile rows
///
/// # Errors
/// * `ParseError::InvalidFormat` - payload is not an array
///
/// Rows without an identifier cannot be joined with anything; they are
/// skipped with a warning.
pub fn parse_profiles(raw: &Value) -> Result<Vec<Profile>, ParseError> {
    let rows = raw.as_array().ok_or_else(|| {
        ParseError::InvalidFormat(format!(
            "expected an array of profiles, got {}",
            value_kind(raw)
        ))
    })?;

    let mut profiles = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for (index, row) in rows.iter().enumerate() {
        match profile_from_row(row) {
            Some(profile) => profiles.push(profile),
            None => {
                skipped += 1;
                debug!("Skipping profile row {}: no usable identifier", index);
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} profile row(s) without an identifier", skipped);
    }

    debug!("Parsed {} profiles", profiles.len());
    Ok(profiles)
}

/// Coerce an identity-provider payload into typed accounts
///
/// Accepts either a bare array or an object wrapping the array under one of
/// the known list keys (`{"users": [...]}` from the admin API).
pub fn parse_accounts(raw: &Value) -> Result<Vec<Account>, ParseError> {
    let rows = extract_account_rows(raw)?;

    let mut accounts = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    let mut unknown_created_at = 0usize;

    for row in rows {
        match account_from_row(row) {
            Some(account) => {
                if account.created_at.is_none() {
                    unknown_created_at += 1;
                }
                accounts.push(account);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} account row(s) without an identifier", skipped);
    }
    if unknown_created_at > 0 {
        debug!(
            "{} account(s) have a missing or unparseable creation time",
            unknown_created_at
        );
    }

    debug!("Parsed {} accounts", accounts.len());
    Ok(accounts)
}

fn extract_account_rows(raw: &Value) -> Result<&Vec<Value>, ParseError> {
    if let Some(rows) = raw.as_array() {
        return Ok(rows);
    }

    if let Some(obj) = raw.as_object() {
        for name in ACCOUNT_LIST_FIELD_NAMES {
            if let Some(rows) = obj.get(*name).and_then(Value::as_array) {
                return Ok(rows);
            }
        }
    }

    Err(ParseError::InvalidFormat(format!(
        "expected an array of accounts or an object with one of {:?}, got {}",
        ACCOUNT_LIST_FIELD_NAMES,
        value_kind(raw)
    )))
}

fn profile_from_row(row: &Value) -> Option<Profile> {
    let obj = row.as_object()?;
    let id = extract_id(obj)?;

    Some(Profile {
        id,
        email: text_field(obj, "email"),
        telephone: text_field(obj, "telephone"),
        nom: text_field(obj, "nom"),
        prenom: text_field(obj, "prenom"),
        societe: text_field(obj, "societe"),
        category: text_field(obj, "category"),
        slug: text_field(obj, "slug"),
        avatar_url: text_field(obj, "avatar_url"),
        is_pro: flag_field(obj, "is_pro"),
        is_admin: flag_field(obj, "is_admin"),
    })
}

fn account_from_row(row: &Value) -> Option<Account> {
    let obj = row.as_object()?;
    let id = extract_id(obj)?;

    let created_at = CREATED_AT_FIELD_NAMES
        .iter()
        .find_map(|name| obj.get(*name))
        .and_then(parse_timestamp);

    Some(Account {
        id,
        created_at,
        email: text_field(obj, "email"),
    })
}

fn extract_id(obj: &Map<String, Value>) -> Option<String> {
    ID_FIELD_NAMES
        .iter()
        .filter_map(|name| obj.get(*name))
        .find_map(scalar_to_string)
}

/// Text field, with empty strings treated as absent
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(scalar_to_string)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn flag_field(obj: &Map<String, Value>, key: &str) -> bool {
    match obj.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Parse a creation timestamp leniently
///
/// **Public** - exposed for tests and for callers building accounts by hand
///
/// Accepts RFC 3339, Postgres text output (`2024-03-05 12:34:56.123+00`),
/// naive ISO timestamps (assumed UTC) and epoch milliseconds. Anything else
/// is `None`.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    debug!("Unparseable timestamp: {}", s);
    None
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_parse_timestamp_rfc3339() {
        let ts = parse_timestamp(&json!("2024-03-05T12:00:00Z")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let ts = parse_timestamp(&json!("2024-03-05T14:00:00+02:00")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_postgres_text() {
        let ts = parse_timestamp(&json!("2024-03-05 12:00:00.5+00")).unwrap();
        assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap().timestamp());
    }

    #[test]
    fn test_parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp(&json!("2024-03-05T12:00:00.123456")).unwrap();
        assert_eq!(ts.timestamp(), Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap().timestamp());
    }

    #[test]
    fn test_parse_timestamp_epoch_millis() {
        let ts = parse_timestamp(&json!(1_709_640_000_000i64)).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(parse_timestamp(&json!("yesterday")).is_none());
        assert!(parse_timestamp(&json!("")).is_none());
        assert!(parse_timestamp(&json!(null)).is_none());
        assert!(parse_timestamp(&json!(true)).is_none());
    }

    #[test]
    fn test_text_field_treats_empty_as_absent() {
        let row = json!({"id": "1", "email": "  ", "nom": "Dupont"});
        let profile = profile_from_row(&row).unwrap();
        assert!(profile.email.is_none());
        assert_eq!(profile.nom.as_deref(), Some("Dupont"));
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let row = json!({"id": 42});
        assert_eq!(profile_from_row(&row).unwrap().id, "42");
    }

    #[test]
    fn test_null_is_pro_means_standard() {
        let row = json!({"id": "1", "is_pro": null});
        assert!(!profile_from_row(&row).unwrap().is_pro);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            Profile::new("1").with_name("Dupont", "Marie").display_name().as_deref(),
            Some("Dupont Marie")
        );
        let mut only_first = Profile::new("2");
        only_first.prenom = Some("Marie".to_string());
        assert_eq!(only_first.display_name().as_deref(), Some("Marie"));
        assert!(Profile::new("3").display_name().is_none());
    }
}
