//! CLI argument definitions for Taskwise.

use crate::models::MAX_WINDOW_DAYS;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Taskwise - capture, prioritize and analyze your to-dos.
///
/// Capture free text with `tw capture`, see what to do next with `tw plan`.
#[derive(Parser, Debug)]
#[command(name = "tw")]
#[command(
    author,
    version,
    long_version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("TW_GIT_COMMIT"),
        " ",
        env!("TW_BUILD_TIMESTAMP"),
        ")"
    ),
    about = "Task intelligence for a smart to-do list",
    long_about = None
)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Log engine decisions to stderr (same as TW_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory holding tasks.jsonl, context.jsonl and config.kdl
    #[arg(long = "data-dir", global = true, env = "TW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the data directory and empty stores
    Init,

    /// Turn free text into a task (priority, category, due date and tags are inferred)
    ///
    /// Explicit flags always win over inferred values.
    Capture {
        /// The captured text, e.g. "Urgent: call client tomorrow at 2pm"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Task title (default: cleaned-up text)
        #[arg(short, long)]
        title: Option<String>,

        /// Task description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority (urgent, high, medium, low)
        #[arg(short, long)]
        priority: Option<String>,

        /// Category label (work, personal, health, learning, ...)
        #[arg(short, long)]
        category: Option<String>,

        /// Due date (ISO-8601, e.g. 2025-07-08T14:00:00Z or 2025-07-08)
        #[arg(long)]
        due: Option<String>,

        /// Estimated duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// Tags (replaces inferred tags when given)
        #[arg(long)]
        tag: Vec<String>,

        /// Mark the text as a voice transcript
        #[arg(long)]
        voice: bool,

        /// Estimate a duration even when no duration keyword is present
        #[arg(long)]
        estimate: bool,

        /// Reference time for relative dates (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Task management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// List tasks in priority and scheduling order
    Rank {
        /// Include completed and cancelled tasks
        #[arg(long)]
        all: bool,

        /// Reference time (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Group active tasks into overdue, today, upcoming and later
    Plan {
        /// Reference time (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Context entries (emails, messages, notes)
    Context {
        #[command(subcommand)]
        command: ContextCommands,
    },

    /// Productivity snapshot with insights
    Analytics {
        /// Window length in days, ending now
        #[arg(
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(..=MAX_WINDOW_DAYS as i64)
        )]
        days: u32,

        /// Completions per window treated as full throughput
        #[arg(long)]
        baseline: Option<f64>,

        /// Window end (default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks
    List {
        /// Filter by status (pending, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show task details
    Show {
        /// Task ID (e.g., tw-a1b2)
        id: String,
    },

    /// Move a task to a new status
    Status {
        /// Task ID
        id: String,

        /// New status (pending, in_progress, completed, cancelled)
        status: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

/// Context subcommands
#[derive(Subcommand, Debug)]
pub enum ContextCommands {
    /// Store and interpret a context entry
    Add {
        /// Entry content
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,

        /// Where it came from (whatsapp, email, notes, calendar, other)
        #[arg(short, long, default_value = "other")]
        source: String,

        /// Entry timestamp (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// List context entries
    List,

    /// Show a context entry with its keywords, urgency and sentiment
    Show {
        /// Entry ID (e.g., twc-a1b2)
        id: String,
    },

    /// Suggest tasks from an entry's actionable sentences
    Suggest {
        /// Entry ID
        id: String,

        /// Save the suggestions as tasks
        #[arg(long)]
        create: bool,

        /// Reference time for relative dates (default: the entry timestamp)
        #[arg(long)]
        now: Option<String>,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,

    /// Set a value in the data-directory config.kdl
    Set {
        /// Config key (e.g. default-priority, throughput-baseline, category.garden)
        key: String,

        /// Value (category keywords are comma separated)
        value: String,
    },
}
