//! # Thesis Tracker CLI
//!
//! A file-backed productivity tracker for thesis writing: to-do tasks with
//! steps and tags, logged work reports, per-section progress, statistics and
//! a pomodoro-style work timer.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! thesis add "Draft Intro" --category Introduction --priority high --due 2024-03-01 --estimated 5
//!
//! # Log a work session against it
//! thesis report add --category Introduction --task "Draft Intro" --time 2 --result 4 --focus 3
//!
//! # See where the time went
//! thesis stats
//!
//! # Focus for 25 minutes
//! thesis timer
//! ```
//!
//! Data lives in a single JSON document at `~/.thesis/thesis_data.json`
//! (override with `--db`). Every mutation persists immediately with an
//! atomic overwrite, and a corrupt or missing file falls back to a fresh
//! seeded document rather than blocking startup.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod error;
pub mod fields;
pub mod model;
pub mod query;
pub mod store;
pub mod timer;
pub mod tui {
    pub mod timer;
}

use cli::Cli;
use cmd::*;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Commands that never touch the data file.
    match &cli.command {
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        Commands::Timer { minutes } => {
            cmd_timer(*minutes);
            return;
        }
        _ => {}
    }

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let data_dir = PathBuf::from(home).join(".thesis");
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
        data_dir.join("thesis_data.json")
    });

    let mut store = Store::load(&db_path);

    match cli.command {
        Commands::Completions { .. } => unreachable!("handled above"),
        Commands::Timer { .. } => unreachable!("handled above"),

        Commands::Add {
            name,
            category,
            priority,
            due,
            estimated,
            steps,
            tags,
            notes,
        } => cmd_add(
            &mut store, name, category, priority, due, estimated, steps, tags, notes,
        ),

        Commands::List {
            categories,
            priorities,
            tags,
            sort,
            detail,
        } => cmd_list(&store, categories, priorities, tags, sort, detail),

        Commands::Step { task, index, undo } => cmd_step(&mut store, task, index, undo),

        Commands::Complete { name } => cmd_complete(&mut store, name),

        Commands::Reopen { name } => cmd_reopen(&mut store, name),

        Commands::Notes { name, text } => cmd_notes(&mut store, name, text),

        Commands::Delete { name } => cmd_delete(&mut store, name),

        Commands::Report { action } => cmd_report(&mut store, action),

        Commands::Progress { action } => cmd_progress(&mut store, action),

        Commands::Category { action } => cmd_category(&mut store, action),

        Commands::Tag { action } => cmd_tag(&mut store, action),

        Commands::Stats => cmd_stats(&store),

        Commands::Timeline => cmd_timeline(&store),

        Commands::Export { output } => cmd_export(&store, output),

        Commands::Import { input } => cmd_import(&mut store, input),
    }
}
