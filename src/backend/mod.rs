//! Hosted backend communication.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{Collection, ListQuery, RawPayload};
