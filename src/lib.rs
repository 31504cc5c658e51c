//! Market Admin
//!
//! User analytics for the marketplace admin console: merges profile-store
//! records with identity-provider accounts and derives summary counts, a
//! growth rate and a monthly registration histogram.
//!
//! This crate provides the core implementation for the
//! `market-admin` CLI tool.
//!
//! ```ignore
//! use market_admin::aggregator::{histogram_by_month, merge, summarize};
//!
//! let users = merge(&profiles, &accounts);
//! let summary = summarize(&users, now);
//! let histogram = histogram_by_month(&users);
//! ```

pub mod aggregator;
pub mod backend;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
