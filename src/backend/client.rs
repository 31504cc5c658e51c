//! HTTP client for the hosted profile store and identity provider.

use super::types::{Collection, ListQuery, RawPayload};
use crate::utils::config::{ACCOUNTS_PATH, DEFAULT_BACKEND_TIMEOUT, PROFILES_PATH};
use crate::utils::error::BackendError;
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;

/// Client for fetching profiles and accounts with a service key
pub struct BackendClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Result<Self, BackendError> {
        let base_url = normalize_base_url(&base_url.into())?;

        let client = Client::builder()
            .timeout(DEFAULT_BACKEND_TIMEOUT)
            .build()
            .map_err(BackendError::RequestFailed)?;

        Ok(Self {
            client,
            base_url,
            service_key: service_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch up to `limit` profile rows from the profile store
    pub fn fetch_profiles(&self, limit: usize) -> Result<RawPayload, BackendError> {
        self.fetch(Collection::Profiles, ListQuery::new(limit))
    }

    /// Fetch up to `limit` accounts from the identity provider
    pub fn fetch_accounts(&self, limit: usize) -> Result<RawPayload, BackendError> {
        self.fetch(Collection::Accounts, ListQuery::new(limit))
    }

    fn fetch(&self, collection: Collection, query: ListQuery) -> Result<RawPayload, BackendError> {
        let url = endpoint_url(&self.base_url, collection);

        info!("Fetching {} from: {}", collection.name(), url);
        debug!("Query: {:?}", query.params(collection));

        let response = self
            .client
            .get(&url)
            .query(&query.params(collection))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .map_err(BackendError::RequestFailed)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized(status.as_u16()));
        }

        if !status.is_success() {
            return Err(BackendError::InvalidResponse(format!(
                "HTTP {}: {}",
                status,
                response.text().unwrap_or_default()
            )));
        }

        let payload: RawPayload = response.json().map_err(BackendError::RequestFailed)?;

        debug!("Received {} payload ({})", collection.name(), payload_size_hint(&payload));
        Ok(payload)
    }
}

/// Strip trailing slashes and check the scheme
fn normalize_base_url(url: &str) -> Result<String, BackendError> {
    let trimmed = url.trim().trim_end_matches('/');

    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(BackendError::InvalidUrl(format!(
            "{} (must start with http:// or https://)",
            url
        )));
    }

    Ok(trimmed.to_string())
}

fn endpoint_url(base_url: &str, collection: Collection) -> String {
    let path = match collection {
        Collection::Profiles => PROFILES_PATH,
        Collection::Accounts => ACCOUNTS_PATH,
    };
    format!("{}{}", base_url, path)
}

fn payload_size_hint(payload: &RawPayload) -> String {
    match payload {
        RawPayload::Array(rows) => format!("{} rows", rows.len()),
        RawPayload::Object(obj) => format!("object with {} keys", obj.len()),
        _ => "scalar".to_string(),
    }
}
