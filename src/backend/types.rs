//! Request/response types for the hosted backend.
//!
//! The profile store speaks PostgREST and the identity provider exposes an
//! admin listing; both return JSON we keep opaque until the parser coerces it.

/// Raw payload from either source (validated later by the parser)
pub type RawPayload = serde_json::Value;

/// Which upstream collection a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Profiles,
    Accounts,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Accounts => "accounts",
        }
    }
}

/// Listing query, capped at the backend's page size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: usize,
}

impl ListQuery {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Query-string pairs for the given collection
    pub fn params(&self, collection: Collection) -> Vec<(&'static str, String)> {
        match collection {
            Collection::Profiles => vec![
                ("select", "*".to_string()),
                ("limit", self.limit.to_string()),
            ],
            Collection::Accounts => vec![
                ("page", "1".to_string()),
                ("per_page", self.limit.to_string()),
            ],
        }
    }
}
