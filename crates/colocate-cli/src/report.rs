//! Plain-text rendering of the ranking summary.

use std::fmt::Write;

use colocate_core::{CategorySet, RankedMatch, SummaryEntry};

fn render_matches(out: &mut String, category: &str, total: usize, matches: &[RankedMatch]) {
    let _ = writeln!(out, "   {category} ({total} total):");
    if matches.is_empty() {
        let _ = writeln!(out, "     - none");
    }
    for m in matches {
        let _ = writeln!(out, "     - {} ({:.2} mi)", m.name, m.distance_miles);
    }
}

pub(crate) fn render_summary(summary: &[SummaryEntry], categories: &CategorySet) -> String {
    let mut out = String::new();
    if summary.is_empty() {
        let _ = writeln!(
            out,
            "No {} has a {} or {} nearby.",
            categories.anchor, categories.secondary, categories.tertiary
        );
        return out;
    }

    let _ = writeln!(
        out,
        "Top {} {} locations by nearby {} + {}:",
        summary.len(),
        categories.anchor,
        categories.secondary,
        categories.tertiary
    );
    for (rank, entry) in summary.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}. {} ({} nearby)",
            rank + 1,
            entry.anchor_name,
            entry.total_hits()
        );
        render_matches(
            &mut out,
            &categories.secondary,
            entry.total_secondary,
            &entry.secondary,
        );
        render_matches(
            &mut out,
            &categories.tertiary,
            entry.total_tertiary,
            &entry.tertiary,
        );
    }
    out
}
