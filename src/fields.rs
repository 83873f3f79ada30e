//! Enumerations and fixed vocabularies for the thesis tracker.
//!
//! This module defines the structured field types shared by tasks and reports,
//! the fixed list of thesis sections tracked on the Progress page, and the
//! builtin category/tag seeds a fresh data file starts with.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task priority. Declaration order is the sort order (High first).
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Priority {
    #[serde(alias = "high")]
    High,
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

/// Which of a report's two ratings to aggregate.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RatingField {
    Result,
    Focus,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    /// Due date, soonest first.
    Due,
    /// Priority, High before Medium before Low.
    Priority,
    /// Estimated time, largest first.
    Estimated,
}

/// Thesis sections tracked on the progress map. Fixed set; progress updates
/// for any other name are rejected.
pub const SECTIONS: [&str; 6] = [
    "Introduction",
    "Literature Review",
    "Methodology",
    "Results",
    "Discussion",
    "Conclusion",
];

/// Categories seeded into a fresh data file.
pub fn default_categories() -> Vec<String> {
    [
        "Introduction",
        "Literature Review",
        "Methodology",
        "Results",
        "Discussion",
        "Conclusion",
        "Writing",
        "Research",
        "Data Analysis",
        "Meetings",
        "Other",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Tags seeded into a fresh data file.
pub fn default_tags() -> Vec<String> {
    ["Important", "Urgent", "Long-term"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}
