use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tsk")]
#[command(about = "Plain-text personal task tracker")]
#[command(version)]
pub struct Cli {
    /// Task directory (default: ~/.tasks)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add {
        /// Task description
        description: String,
        /// Client/project name (defaults to the inbox)
        #[arg(short, long)]
        project: Option<String>,
        /// Due date (YYYY-MM-DD, today, tomorrow, mon-sun)
        #[arg(short, long)]
        due: Option<String>,
        /// Mark as urgent
        #[arg(short, long)]
        urgent: bool,
        /// Effort estimate (e.g. 2h, 30m)
        #[arg(short, long)]
        effort: Option<String>,
    },

    /// List tasks across all projects
    List {
        /// Filter by client/project
        #[arg(short, long)]
        project: Option<String>,
        /// Show only urgent or overdue tasks
        #[arg(short, long)]
        urgent: bool,
        /// Show only tasks due within 3 days or overdue
        #[arg(short, long)]
        due_soon: bool,
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
        /// Emit the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a task as complete (fuzzy search by description)
    Done {
        /// Search phrase matched against open task descriptions
        search: String,
    },

    /// Show unsorted inbox tasks
    Inbox,

    /// Move a task to another project (fuzzy search by description)
    Move {
        /// Search phrase matched against open task descriptions
        search: String,
        /// Target project name
        #[arg(long)]
        to: String,
    },
}
