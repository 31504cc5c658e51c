//! Output writers for analytics reports.
//!
//! This module handles:
//! - JSON reports (write and read back)
//! - Text summaries for the terminal

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, validate_path, write_report};
pub use text::render_text_summary;
