use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sched", about = "Single-user task scheduler with recurring due dates")]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.sched/sched.db]
    #[arg(long, env = "SCHED_DB", global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create database and tables (idempotent)
    Init,

    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date (YYYYMMDD; empty means today)
        #[arg(short, long, default_value = "")]
        date: String,
        /// Free-form comment
        #[arg(short, long, default_value = "")]
        comment: String,
        /// Recurrence rule: "y" or "d N" with N in 1..=400
        #[arg(short, long, default_value = "")]
        repeat: String,
    },

    /// List tasks ordered by due date
    List {
        /// Exact date (DD.MM.YYYY) or substring of title/comment
        #[arg(long, default_value = "")]
        search: String,
        /// Maximum number of tasks
        #[arg(long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a task (omitted fields keep their current value)
    Edit {
        /// Task id
        id: i64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New due date (YYYYMMDD)
        #[arg(short, long)]
        date: Option<String>,
        /// New comment
        #[arg(short, long)]
        comment: Option<String>,
        /// New recurrence rule (empty string clears it)
        #[arg(short, long)]
        repeat: Option<String>,
    },

    /// Mark a task complete: one-off tasks are removed, recurring ones advance
    Done {
        /// Task id
        id: i64,
    },

    /// Remove a task
    Rm {
        /// Task id
        id: i64,
    },

    /// Compute the next occurrence of a rule without touching the store
    Next {
        /// Start date (YYYYMMDD)
        date: String,
        /// Recurrence rule
        repeat: String,
        /// Reference date (YYYYMMDD) [default: today]
        #[arg(long)]
        now: Option<String>,
    },
}
