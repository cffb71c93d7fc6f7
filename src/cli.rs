use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::Priority;

#[derive(Parser)]
#[command(name = "zenith")]
#[command(about = "Task and habit tracker with daily metrics and an AI coach")]
#[command(version)]
pub struct Cli {
    /// Override the data directory (database and settings)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Manage habit protocols
    Habit {
        #[command(subcommand)]
        action: HabitAction,
    },
    /// Log and review daily metrics
    Metrics {
        #[command(subcommand)]
        action: MetricsAction,
    },
    /// Show the 7-day chart, lifetime totals and habit compliance
    Stats,
    /// Ask the AI coach for insights on the current collection
    Coach {
        /// Override the configured model for this request
        #[arg(long)]
        model: Option<String>,
    },
    /// Sign in as a (mocked) user; swaps to that user's collections
    Login {
        /// Display name
        name: String,
        /// Email address
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and return to the guest collections
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task text
        text: String,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },
    /// List tasks, newest first
    List,
    /// Toggle completion; matches an id prefix or the exact text
    Toggle { selector: String },
    /// Replace a task's text
    Edit { selector: String, text: String },
    /// Delete a task
    Delete { selector: String },
    /// Delete every completed task
    ClearDone,
}

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new habit protocol
    Add {
        /// Habit name
        name: String,
        /// Monthly goal in days
        #[arg(short, long, default_value_t = crate::models::DEFAULT_HABIT_GOAL)]
        goal: u32,
    },
    /// List habits with this month's progress
    List,
    /// Toggle a day mark; defaults to today
    Check {
        selector: String,
        /// Day of month (1-31)
        #[arg(short, long)]
        day: Option<u32>,
    },
    /// Delete a habit
    Delete { selector: String },
}

#[derive(Subcommand)]
pub enum MetricsAction {
    /// Upsert today's metric record (or another date's with --date)
    Log {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
        /// Screen time in minutes
        #[arg(long)]
        screen_time: Option<u32>,
        /// Mood, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        mood: Option<u8>,
        /// Energy, 1-10
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        energy: Option<u8>,
        /// Biggest win of the day
        #[arg(long)]
        achievement: Option<String>,
    },
    /// Show the last week of metric records
    Show,
}
