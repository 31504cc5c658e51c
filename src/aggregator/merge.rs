//! Join profiles with identity-provider accounts.
//!
//! Profiles are the driving side: every profile yields exactly one merged
//! user, in input order. Accounts only contribute a creation time and a
//! fallback email. Provisioning lag means either side can be missing a
//! counterpart, so unmatched records are expected rather than errors.

use crate::parser::{Account, Profile};
use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-request join of a `Profile` and its `Account`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedUser {
    pub profile: Profile,

    /// From the matched account; `None` if unmatched or unknown
    pub created_at: Option<DateTime<Utc>>,

    /// Profile email, else the account's
    pub email: Option<String>,
}

impl MergedUser {
    pub fn id(&self) -> &str {
        &self.profile.id
    }

    pub fn is_pro(&self) -> bool {
        self.profile.is_pro
    }
}

/// Merge profiles with accounts by identifier
///
/// **Public** - first step of the analytics pipeline
///
/// # Arguments
/// * `profiles` - Profiles, unique by id
/// * `accounts` - Accounts, possibly incomplete or with extra ids
///
/// # Returns
/// One `MergedUser` per profile, same order as `profiles`
pub fn merge(profiles: &[Profile], accounts: &[Account]) -> Vec<MergedUser> {
    let index = index_accounts(accounts);

    let merged: Vec<MergedUser> = profiles
        .iter()
        .map(|profile| {
            let account = index.get(profile.id.as_str()).copied();
            merge_one(profile, account)
        })
        .collect();

    let matched = merged.iter().filter(|u| index.contains_key(u.id())).count();
    debug!(
        "Merged {} profiles with {} accounts ({} matched, {} unmatched)",
        profiles.len(),
        accounts.len(),
        matched,
        profiles.len() - matched
    );

    merged
}

/// Index accounts by id; the first occurrence of a duplicate id wins
fn index_accounts(accounts: &[Account]) -> HashMap<&str, &Account> {
    let mut index = HashMap::with_capacity(accounts.len());
    for account in accounts {
        index.entry(account.id.as_str()).or_insert(account);
    }
    index
}

fn merge_one(profile: &Profile, account: Option<&Account>) -> MergedUser {
    let email = profile
        .email
        .clone()
        .or_else(|| account.and_then(|a| a.email.clone()));

    MergedUser {
        profile: profile.clone(),
        created_at: account.and_then(|a| a.created_at),
        email,
    }
}
