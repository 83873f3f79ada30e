//! Record types for the persisted thesis data document.
//!
//! The document is a single JSON object with keys `progress`, `reports`,
//! `categories`, `tasks`, `todo` and `tags`. Date fields are ISO-8601 strings
//! on the wire (`YYYY-MM-DD` for task due dates, a full timestamp for report
//! dates); chrono's serde impls resolve the string/typed-date boundary so the
//! rest of the crate only ever sees `NaiveDate`/`NaiveDateTime`.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::fields::{default_categories, default_tags, Priority};

/// One step of a task's checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    #[serde(alias = "step")]
    pub description: String,
    pub completed: bool,
}

impl Step {
    pub fn new(description: impl Into<String>) -> Self {
        Step {
            description: description.into(),
            completed: false,
        }
    }
}

/// A to-do item.
///
/// `actual_time` accumulates from submitted reports whose `task` field matches
/// this task's name exactly; it only decreases on reset or import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub category: String,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub estimated_time: f64,
    #[serde(default)]
    pub actual_time: f64,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub notes: String,
}

/// A logged work session. Immutable once created, except for deletion.
///
/// `task` is free text; it links to a to-do item only by exact name match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub date: NaiveDateTime,
    pub category: String,
    pub task: String,
    pub time_spent: f64,
    pub result_rating: u8,
    pub focus_rating: u8,
    #[serde(default)]
    pub note: String,
}

/// The full in-memory model behind the data file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub progress: BTreeMap<String, u8>,
    #[serde(default)]
    pub reports: Vec<Report>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Known task-name vocabulary, fed by task creation and report submission.
    #[serde(default)]
    pub tasks: Vec<String>,
    #[serde(default)]
    pub todo: Vec<Task>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for Model {
    fn default() -> Self {
        Model {
            progress: BTreeMap::new(),
            reports: Vec::new(),
            categories: default_categories(),
            tasks: Vec::new(),
            todo: Vec::new(),
            tags: default_tags(),
        }
    }
}

impl Model {
    /// Re-seed the builtin category and tag lists if a loaded document left
    /// them empty. Non-empty lists are kept as-is.
    pub fn ensure_seeds(&mut self) {
        if self.categories.is_empty() {
            self.categories = default_categories();
        }
        if self.tags.is_empty() {
            self.tags = default_tags();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_model() -> Model {
        let mut m = Model::default();
        m.progress.insert("Introduction".into(), 40);
        m.todo.push(Task {
            name: "Draft Intro".into(),
            category: "Introduction".into(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            estimated_time: 5.0,
            actual_time: 2.0,
            steps: vec![Step::new("Outline"), Step::new("First pass")],
            tags: vec!["Important".into()],
            completed: false,
            notes: "Start with the research gap.".into(),
        });
        m.tasks.push("Draft Intro".into());
        m.reports.push(Report {
            date: NaiveDate::from_ymd_opt(2024, 2, 20)
                .unwrap()
                .and_hms_opt(14, 30, 5)
                .unwrap(),
            category: "Introduction".into(),
            task: "Draft Intro".into(),
            time_spent: 2.0,
            result_rating: 4,
            focus_rating: 3,
            note: "Rough outline done".into(),
        });
        m
    }

    #[test]
    fn round_trip_preserves_model() {
        let m = sample_model();
        let raw = serde_json::to_string_pretty(&m).unwrap();
        let back: Model = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn dates_serialize_as_iso_strings() {
        let m = sample_model();
        let doc: serde_json::Value = serde_json::to_value(&m).unwrap();
        assert_eq!(doc["todo"][0]["due_date"], "2024-03-01");
        assert_eq!(doc["reports"][0]["date"], "2024-02-20T14:30:05");
    }

    #[test]
    fn legacy_step_key_is_accepted() {
        let raw = r#"{"todo":[{"name":"a","category":"Other","priority":"High",
            "due_date":"2024-01-01","estimated_time":1.0,
            "steps":[{"step":"read","completed":true}]}]}"#;
        let m: Model = serde_json::from_str(raw).unwrap();
        assert_eq!(m.todo[0].steps[0].description, "read");
        assert!(m.todo[0].steps[0].completed);
    }

    #[test]
    fn default_model_is_seeded() {
        let m = Model::default();
        assert!(m.categories.contains(&"Writing".to_string()));
        assert_eq!(m.tags, vec!["Important", "Urgent", "Long-term"]);
        assert!(m.todo.is_empty() && m.reports.is_empty());
    }
}
