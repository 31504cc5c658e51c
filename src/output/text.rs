//! Plain-text rendering of an analytics report for the terminal.

use crate::parser::schema::{AnalyticsReport, MonthEntry};

const BAR_WIDTH: usize = 40;
const RULE_WIDTH: usize = 64;

/// Render the report as a terminal summary
///
/// **Public** - printed by `analyze --summary`
pub fn render_text_summary(report: &AnalyticsReport) -> String {
    let mut lines = Vec::new();
    let s = &report.summary;
    let d = &report.distribution;

    lines.push("=".repeat(RULE_WIDTH));
    lines.push("USER ANALYTICS".to_string());
    lines.push(format!("Reference time: {}", report.reference_time));
    lines.push("=".repeat(RULE_WIDTH));

    lines.push(format!("  {:<28} {:>10}", "Total users", s.total_users));
    lines.push(format!("  {:<28} {:>10}", "New users (30 days)", s.new_users_this_month));
    lines.push(format!("  {:<28} {:>10}", "Previous 30 days", s.previous_month_users));
    lines.push(format!("  {:<28} {:>+9.1}%", "Growth rate", s.growth_rate));
    lines.push(String::new());

    lines.push("  Pro vs Standard".to_string());
    lines.push(format!("    Pro       {:>6}  {:>5.1}%", d.pro, d.pro_percentage));
    lines.push(format!("    Standard  {:>6}  {:>5.1}%", d.standard, d.standard_percentage));
    lines.push(String::new());

    lines.push("  Registrations by month".to_string());
    if report.timeline.is_empty() {
        lines.push("    (no data)".to_string());
    } else {
        lines.extend(render_bars(&report.timeline));
    }
    lines.push(String::new());

    lines.push("  Top users".to_string());
    if report.top_users.is_empty() {
        lines.push("    (no users)".to_string());
    }
    for (rank, user) in report.top_users.iter().enumerate() {
        lines.push(format!(
            "    {}. {}{} <{}>",
            rank + 1,
            user.display_name,
            if user.is_pro { " [Pro]" } else { "" },
            user.email.as_deref().unwrap_or("no email")
        ));
    }

    lines.push("=".repeat(RULE_WIDTH));
    lines.join("\n")
}

/// Bars scaled to the busiest month
fn render_bars(entries: &[MonthEntry]) -> Vec<String> {
    let max = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);
    let label_width = entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);

    entries
        .iter()
        .map(|e| {
            let filled = e.count * BAR_WIDTH / max;
            format!(
                "    {:<width$}  {:<bar$} {}",
                e.label,
                "█".repeat(filled),
                e.count,
                width = label_width,
                bar = BAR_WIDTH
            )
        })
        .collect()
}
