//! The data store and its JSON codec, plus small display utilities.
//!
//! `Store` owns the in-memory [`Model`] and its backing file. Every mutating
//! operation validates first, applies the change, then persists the whole
//! document with an atomic overwrite (temp file + rename). A missing or
//! unparsable data file falls back to a fresh seeded model so startup never
//! blocks on bad data.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};

use crate::error::StoreError;
use crate::fields::{format_priority, SECTIONS};
use crate::model::{Model, Report, Task};

/// File-backed store for the thesis data document.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    pub model: Model,
}

/// Parse a raw JSON document into a model.
pub fn parse_model(raw: &str) -> Result<Model, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptStore(e.to_string()))
}

impl Store {
    /// Load the store from a JSON file, seeding a fresh model if the file is
    /// missing or unparsable.
    pub fn load(path: &Path) -> Self {
        let model = if path.exists() {
            let mut buf = String::new();
            match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
                Ok(_) => match parse_model(&buf) {
                    Ok(mut m) => {
                        m.ensure_seeds();
                        m
                    }
                    Err(e) => {
                        eprintln!("Error parsing data file, starting fresh: {e}");
                        Model::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading data file, starting fresh: {e}");
                    Model::default()
                }
            }
        } else {
            Model::default()
        };
        Store {
            path: path.to_path_buf(),
            model,
        }
    }

    /// Persist the model using an atomic write (temp file + rename).
    pub fn save(&self) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(&self.model).map_err(io::Error::from)?;
        let mut f = File::create(&tmp)?;
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, &self.path)?;
        Ok(())
    }

    /// Render the full document as pretty JSON, as written to disk.
    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.model)
            .map_err(|e| StoreError::Persist(io::Error::from(e)))
    }

    /// Replace the whole model, e.g. from an imported document, and persist.
    /// The replacement is accepted verbatim; no re-validation.
    pub fn replace(&mut self, model: Model) -> Result<(), StoreError> {
        self.model = model;
        self.save()
    }

    /// Add a to-do task. Rejects an empty name, an unknown category and a
    /// duplicate active name. Registers the name in the task vocabulary and
    /// any new tags in the tag vocabulary.
    pub fn add_task(&mut self, task: Task) -> Result<(), StoreError> {
        if task.name.trim().is_empty() {
            return Err(StoreError::Validation("task name cannot be empty".into()));
        }
        if !self.model.categories.contains(&task.category) {
            return Err(StoreError::Validation(format!(
                "unknown category '{}'",
                task.category
            )));
        }
        if self.model.todo.iter().any(|t| t.name == task.name) {
            return Err(StoreError::Validation(format!(
                "a task named '{}' already exists",
                task.name
            )));
        }
        if !self.model.tasks.contains(&task.name) {
            self.model.tasks.push(task.name.clone());
        }
        for tag in &task.tags {
            if !self.model.tags.contains(tag) {
                self.model.tags.push(tag.clone());
            }
        }
        self.model.todo.push(task);
        self.save()
    }

    /// Remove the first task with the given name. Returns whether anything
    /// was removed; an absent name is not an error.
    pub fn delete_task(&mut self, name: &str) -> Result<bool, StoreError> {
        match self.model.todo.iter().position(|t| t.name == name) {
            Some(i) => {
                self.model.todo.remove(i);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mark one step of a task done or not done.
    pub fn set_step(&mut self, name: &str, index: usize, done: bool) -> Result<(), StoreError> {
        let task = self.find_task_mut(name)?;
        let len = task.steps.len();
        let step = task.steps.get_mut(index).ok_or(StoreError::IndexOutOfRange {
            what: "step",
            index,
            len,
        })?;
        step.completed = done;
        self.save()
    }

    /// Toggle a task's completion flag.
    ///
    /// On a false-to-true transition only, a completion report is appended:
    /// dated now, carrying the task's category and name, `time_spent` equal to
    /// the accumulated `actual_time`, and both ratings defaulted to 5. Returns
    /// whether such a report was created.
    pub fn set_task_completion(&mut self, name: &str, done: bool) -> Result<bool, StoreError> {
        let task = self.find_task_mut(name)?;
        let was_done = task.completed;
        task.completed = done;
        let mut logged = false;
        if done && !was_done {
            let report = Report {
                date: Local::now().naive_local(),
                category: task.category.clone(),
                task: task.name.clone(),
                time_spent: task.actual_time,
                result_rating: 5,
                focus_rating: 5,
                note: format!("Task completed: {}", task.name),
            };
            self.model.reports.push(report);
            logged = true;
        }
        self.save()?;
        Ok(logged)
    }

    /// Replace the free-form notes on a task.
    pub fn set_task_notes(&mut self, name: &str, notes: String) -> Result<(), StoreError> {
        let task = self.find_task_mut(name)?;
        task.notes = notes;
        self.save()
    }

    /// Append a work report. The category is not validated. If the report's
    /// task matches a to-do item by exact name, that task's `actual_time` is
    /// incremented by `time_spent`; the task name is registered in the
    /// vocabulary either way.
    pub fn add_report(&mut self, report: Report) -> Result<(), StoreError> {
        if !self.model.tasks.contains(&report.task) {
            self.model.tasks.push(report.task.clone());
        }
        if let Some(task) = self.model.todo.iter_mut().find(|t| t.name == report.task) {
            task.actual_time += report.time_spent;
        }
        self.model.reports.push(report);
        self.save()
    }

    /// Remove a report by its position in the stored list.
    pub fn delete_report(&mut self, index: usize) -> Result<Report, StoreError> {
        let len = self.model.reports.len();
        if index >= len {
            return Err(StoreError::IndexOutOfRange {
                what: "report",
                index,
                len,
            });
        }
        let report = self.model.reports.remove(index);
        self.save()?;
        Ok(report)
    }

    /// Set the progress percentage for one thesis section.
    pub fn set_progress(&mut self, section: &str, value: u8) -> Result<(), StoreError> {
        if !SECTIONS.contains(&section) {
            return Err(StoreError::Validation(format!(
                "unknown section '{section}' (expected one of: {})",
                SECTIONS.join(", ")
            )));
        }
        if value > 100 {
            return Err(StoreError::Validation(format!(
                "progress must be between 0 and 100, got {value}"
            )));
        }
        self.model.progress.insert(section.to_string(), value);
        self.save()
    }

    /// Add a category to the end of the list.
    pub fn add_category(&mut self, name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("category name cannot be empty".into()));
        }
        if self.model.categories.iter().any(|c| c == name) {
            return Err(StoreError::Duplicate(format!("category '{name}'")));
        }
        self.model.categories.push(name.to_string());
        self.save()
    }

    /// Remove a category. Tasks and reports referencing it are left alone.
    /// Returns whether anything was removed.
    pub fn remove_category(&mut self, name: &str) -> Result<bool, StoreError> {
        match self.model.categories.iter().position(|c| c == name) {
            Some(i) => {
                self.model.categories.remove(i);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Add a tag. Idempotent: an existing tag is a no-op. Returns whether the
    /// tag was new.
    pub fn add_tag(&mut self, name: &str) -> Result<bool, StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("tag name cannot be empty".into()));
        }
        if self.model.tags.iter().any(|t| t == name) {
            return Ok(false);
        }
        self.model.tags.push(name.to_string());
        self.save()?;
        Ok(true)
    }

    fn find_task_mut(&mut self, name: &str) -> Result<&mut Task, StoreError> {
        self.model
            .todo
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| StoreError::Validation(format!("no task named '{name}'")))
    }
}

/// Parse human-readable due date input.
///
/// Supports "today", "tomorrow", "in Nd", "in Nw" and "YYYY-MM-DD".
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Print tasks in a formatted table, optionally with steps and notes.
pub fn print_task_table(tasks: &[&Task], detail: bool) {
    println!(
        "{:<2} {:<7} {:<11} {:>6} {:>6} {:<18} {}",
        "", "Pri", "Due", "Est", "Act", "Category", "Name [tags]"
    );
    for t in tasks {
        let mark = if t.completed { "x" } else { " " };
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        println!(
            "{:<2} {:<7} {:<11} {:>5.1}h {:>5.1}h {:<18} {}{}",
            mark,
            format_priority(t.priority),
            t.due_date,
            t.estimated_time,
            t.actual_time,
            truncate(&t.category, 18),
            t.name,
            tags
        );
        if detail {
            for (i, step) in t.steps.iter().enumerate() {
                let mark = if step.completed { "x" } else { " " };
                println!("     [{mark}] {i}. {}", step.description);
            }
            if !t.notes.is_empty() {
                println!("     notes: {}", t.notes);
            }
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
