//! Command implementations for the CLI interface.
//!
//! This module contains the subcommand definitions and their handlers, from
//! task and report CRUD through the statistics page to export/import and the
//! work-session timer.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::fields::{Priority, RatingField, SortKey, SECTIONS};
use crate::model::{Report, Step, Task};
use crate::query::*;
use crate::store::{parse_due_input, parse_model, print_task_table, Store};
use crate::tui::timer::run_timer_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new to-do task.
    Add {
        /// Task name, unique within the active list.
        name: String,
        /// Thesis category the task belongs to.
        #[arg(long)]
        category: String,
        /// Priority: high | medium | low.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: String,
        /// Estimated time in hours.
        #[arg(long, default_value_t = 0.0)]
        estimated: f64,
        /// Step description. May be repeated.
        #[arg(long = "step")]
        steps: Vec<String>,
        /// Tag. May be repeated; new tags join the vocabulary.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Free-form notes.
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by category. May be repeated.
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Filter by priority. May be repeated.
        #[arg(long = "priority", value_enum)]
        priorities: Vec<Priority>,
        /// Filter by tag (any match). May be repeated.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Include steps and notes.
        #[arg(long)]
        detail: bool,
    },

    /// Mark one step of a task done (or not done with --undo).
    Step {
        /// Task name.
        task: String,
        /// Zero-based step index.
        index: usize,
        /// Mark the step as not done instead.
        #[arg(long)]
        undo: bool,
    },

    /// Mark a task completed, logging a completion report.
    Complete {
        /// Task name.
        name: String,
    },

    /// Reopen a completed task.
    Reopen {
        /// Task name.
        name: String,
    },

    /// Replace the notes on a task.
    Notes {
        /// Task name.
        name: String,
        /// New notes text.
        text: String,
    },

    /// Delete a task by name.
    Delete {
        /// Task name.
        name: String,
    },

    /// Log and manage work reports.
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },

    /// Show or update per-section thesis progress.
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },

    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Manage tags.
    Tag {
        #[command(subcommand)]
        action: TagAction,
    },

    /// Show productivity statistics.
    Stats,

    /// Show the planned work window for each task.
    Timeline,

    /// Export the full data document as JSON.
    Export {
        /// Output file path (default: stdout).
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a data document, replacing the current state.
    Import {
        /// Input JSON file path.
        input: PathBuf,
    },

    /// Run the work-session countdown timer.
    Timer {
        /// Session length in minutes.
        #[arg(long, default_value_t = crate::timer::WORK_MINUTES)]
        minutes: u64,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Log a work session.
    Add {
        /// Category worked on.
        #[arg(long)]
        category: String,
        /// Task worked on (free text; matched to to-do items by name).
        #[arg(long)]
        task: String,
        /// Time spent in hours.
        #[arg(long)]
        time: f64,
        /// Result rating, 0-5.
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
        result: u8,
        /// Focus rating, 0-5.
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=5))]
        focus: u8,
        /// Free-form note.
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List reports grouped by week, newest first.
    List,
    /// Delete a report by the index shown in the list.
    Delete {
        /// Report index from `report list`.
        index: usize,
    },
}

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Show progress across all thesis sections.
    Show,
    /// Set the progress percentage for one section.
    Set {
        /// Section name (e.g. "Methodology").
        section: String,
        /// Percentage, 0-100.
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: u8,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories.
    List,
    /// Add a category.
    Add { name: String },
    /// Remove a category. Existing tasks and reports keep the old value.
    Remove { name: String },
}

#[derive(Subcommand)]
pub enum TagAction {
    /// List tags.
    List,
    /// Add a tag (no-op if it already exists).
    Add { name: String },
}

/// Add a new task to the store.
pub fn cmd_add(
    store: &mut Store,
    name: String,
    category: String,
    priority: Priority,
    due: String,
    estimated: f64,
    steps: Vec<String>,
    tags: Vec<String>,
    notes: String,
) {
    let Some(due_date) = parse_due_input(&due) else {
        eprintln!("Could not parse due date '{due}'. Try YYYY-MM-DD, \"today\" or \"in 3d\".");
        std::process::exit(1);
    };
    if estimated < 0.0 {
        eprintln!("Estimated time cannot be negative.");
        std::process::exit(1);
    }
    let task = Task {
        name: name.clone(),
        category,
        priority,
        due_date,
        estimated_time: estimated,
        actual_time: 0.0,
        steps: steps
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .map(Step::new)
            .collect(),
        tags,
        completed: false,
        notes,
    };
    match store.add_task(task) {
        Ok(()) => println!("Added task '{name}'"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// List tasks with optional filtering and sorting.
pub fn cmd_list(
    store: &Store,
    categories: Vec<String>,
    priorities: Vec<Priority>,
    tags: Vec<String>,
    sort: SortKey,
    detail: bool,
) {
    let mut tasks = filter_tasks(&store.model.todo, &categories, &priorities, &tags);
    sort_tasks(&mut tasks, sort);
    if tasks.is_empty() {
        println!("No tasks match.");
        return;
    }
    print_task_table(&tasks, detail);
}

/// Toggle one step of a task.
pub fn cmd_step(store: &mut Store, task: String, index: usize, undo: bool) {
    match store.set_step(&task, index, !undo) {
        Ok(()) => {
            let verb = if undo { "unchecked" } else { "checked" };
            println!("Step {index} of '{task}' {verb}.");
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Mark a task completed.
pub fn cmd_complete(store: &mut Store, name: String) {
    match store.set_task_completion(&name, true) {
        Ok(true) => println!("Completed '{name}' and logged a completion report."),
        Ok(false) => println!("'{name}' was already complete."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Reopen a completed task.
pub fn cmd_reopen(store: &mut Store, name: String) {
    match store.set_task_completion(&name, false) {
        Ok(_) => println!("Reopened '{name}'."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Replace a task's notes.
pub fn cmd_notes(store: &mut Store, name: String, text: String) {
    match store.set_task_notes(&name, text) {
        Ok(()) => println!("Updated notes on '{name}'."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Delete a task by name.
pub fn cmd_delete(store: &mut Store, name: String) {
    match store.delete_task(&name) {
        Ok(true) => println!("Deleted '{name}'."),
        Ok(false) => println!("No task named '{name}'."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Handle the `report` subcommands.
pub fn cmd_report(store: &mut Store, action: ReportAction) {
    match action {
        ReportAction::Add {
            category,
            task,
            time,
            result,
            focus,
            note,
        } => {
            if time < 0.0 {
                eprintln!("Time spent cannot be negative.");
                std::process::exit(1);
            }
            let report = Report {
                date: Local::now().naive_local(),
                category,
                task,
                time_spent: time,
                result_rating: result,
                focus_rating: focus,
                note,
            };
            match store.add_report(report) {
                Ok(()) => println!("Report added."),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        ReportAction::List => cmd_report_list(store),
        ReportAction::Delete { index } => match store.delete_report(index) {
            Ok(report) => println!(
                "Deleted report [{index}] ({} - {}).",
                report.date.format("%Y-%m-%d %H:%M"),
                report.task
            ),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}

/// Print reports grouped by week, most recent week first. Each report is
/// prefixed with its stored index, which `report delete` accepts.
fn cmd_report_list(store: &Store) {
    let reports = &store.model.reports;
    if reports.is_empty() {
        println!("No reports logged yet.");
        return;
    }
    let buckets = group_reports_by_week(reports);
    for (week, entries) in buckets.iter().rev() {
        println!("Week of {week}");
        for r in entries {
            let index = reports
                .iter()
                .position(|x| std::ptr::eq(x, *r))
                .unwrap_or(0);
            println!(
                "  [{index}] {}  {}: {}",
                r.date.format("%Y-%m-%d %H:%M"),
                r.category,
                r.task
            );
            println!(
                "        time {:.1}h  result {}/5  focus {}/5",
                r.time_spent, r.result_rating, r.focus_rating
            );
            if !r.note.is_empty() {
                println!("        note: {}", r.note);
            }
        }
    }
}

/// Handle the `progress` subcommands.
pub fn cmd_progress(store: &mut Store, action: ProgressAction) {
    match action {
        ProgressAction::Show => {
            for section in SECTIONS {
                let value = store.model.progress.get(section).copied().unwrap_or(0);
                let filled = (value as usize).min(100) / 5;
                println!(
                    "{:<18} [{:<20}] {:>3}%",
                    section,
                    "#".repeat(filled),
                    value
                );
            }
        }
        ProgressAction::Set { section, value } => match store.set_progress(&section, value) {
            Ok(()) => println!("{section} progress set to {value}%."),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}

/// Handle the `category` subcommands.
pub fn cmd_category(store: &mut Store, action: CategoryAction) {
    match action {
        CategoryAction::List => {
            for c in &store.model.categories {
                println!("{c}");
            }
        }
        CategoryAction::Add { name } => match store.add_category(&name) {
            Ok(()) => println!("Added category '{name}'."),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        CategoryAction::Remove { name } => match store.remove_category(&name) {
            Ok(true) => println!("Removed category '{name}'."),
            Ok(false) => println!("No category named '{name}'."),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}

/// Handle the `tag` subcommands.
pub fn cmd_tag(store: &mut Store, action: TagAction) {
    match action {
        TagAction::List => {
            for t in &store.model.tags {
                println!("{t}");
            }
        }
        TagAction::Add { name } => match store.add_tag(&name) {
            Ok(true) => println!("Added tag '{name}'."),
            Ok(false) => println!("Tag '{name}' already exists."),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
    }
}

/// Print the statistics page: per-day series, totals and category breakdown.
pub fn cmd_stats(store: &Store) {
    let reports = &store.model.reports;
    if reports.is_empty() {
        println!("No reports available yet. Add some reports to see statistics.");
        return;
    }

    println!("Time spent per day:");
    for (date, hours) in aggregate_time_series(reports, |r| r.time_spent, Aggregate::Sum) {
        println!("  {date}  {hours:.1}h");
    }

    println!("\nAverage ratings per day:");
    let result_by_day =
        aggregate_time_series(reports, |r| r.result_rating as f64, Aggregate::Mean);
    let focus_by_day = aggregate_time_series(reports, |r| r.focus_rating as f64, Aggregate::Mean);
    for ((date, result), (_, focus)) in result_by_day.iter().zip(focus_by_day.iter()) {
        println!("  {date}  result {result:.2}  focus {focus:.2}");
    }

    println!("\nProductivity score per day:");
    for (date, score) in aggregate_time_series(reports, productivity_score, Aggregate::Mean) {
        println!("  {date}  {score:.2}");
    }

    println!("\nTotal time spent: {:.1} hours", total_time(reports));
    println!(
        "Average result rating: {:.2}",
        average_rating(reports, RatingField::Result)
    );
    println!(
        "Average focus rating: {:.2}",
        average_rating(reports, RatingField::Focus)
    );

    println!("\nTime spent by category:");
    let mut by_category: Vec<(String, f64)> = time_by_category(reports).into_iter().collect();
    by_category.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (category, hours) in by_category {
        println!("  {category:<18} {hours:.1}h");
    }
}

/// Print the planned work window for each task, soonest due date first.
pub fn cmd_timeline(store: &Store) {
    if store.model.todo.is_empty() {
        println!("No tasks available to display in the timeline.");
        return;
    }
    let mut tasks = filter_tasks(&store.model.todo, &[], &[], &[]);
    sort_tasks(&mut tasks, SortKey::Due);
    for t in tasks {
        let (start, end) = schedule_window(t);
        println!("{start} .. {end}  {} ({})", t.name, t.category);
    }
}

/// Export the full data document.
pub fn cmd_export(store: &Store, output: Option<PathBuf>) {
    let json = match store.export_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    match output {
        Some(path) => match fs::write(&path, json) {
            Ok(()) => println!("Exported data to {}", path.display()),
            Err(e) => {
                eprintln!("Failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => println!("{json}"),
    }
}

/// Import a data document, wholesale-replacing the current model. A parse
/// failure leaves the current state untouched.
pub fn cmd_import(store: &mut Store, input: PathBuf) {
    let raw = match fs::read_to_string(&input) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read {}: {e}", input.display());
            std::process::exit(1);
        }
    };
    let model = match parse_model(&raw) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Invalid data file, nothing imported: {e}");
            std::process::exit(1);
        }
    };
    match store.replace(model) {
        Ok(()) => println!("Data imported from {}.", input.display()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Run the countdown timer view.
pub fn cmd_timer(minutes: u64) {
    if let Err(e) = run_timer_tui(minutes) {
        eprintln!("Timer error: {e}");
        std::process::exit(1);
    }
}

/// Generate shell completion scripts on stdout.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
