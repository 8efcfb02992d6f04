//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the tn CLI.

use clap::{Parser, Subcommand, ValueEnum};

/// tn - A Rust CLI for the TaskNotes HTTP API
#[derive(Parser, Debug)]
#[command(name = "tn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// TaskNotes API base URL (default: from config, then http://localhost:8080)
    #[arg(long, global = true, env = "TASKNOTES_API_URL")]
    pub api_url: Option<String>,

    /// Override API token (default: from config/env)
    #[arg(long, global = true, env = "TASKNOTES_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks
    #[command(alias = "l", alias = "ls")]
    List {
        /// Filter expression (see `tn filter-help`)
        #[arg(short, long)]
        filter: Option<String>,

        /// Only tasks with this status
        #[arg(short, long)]
        status: Option<String>,

        /// Only tasks with this priority
        #[arg(short = 'P', long)]
        priority: Option<String>,

        /// Only tasks with this tag (repeatable)
        #[arg(short, long, action = clap::ArgAction::Append)]
        tag: Vec<String>,

        /// Only tasks with this context (repeatable)
        #[arg(short, long, action = clap::ArgAction::Append)]
        context: Vec<String>,

        /// Only tasks in this project (repeatable)
        #[arg(short, long, action = clap::ArgAction::Append)]
        project: Vec<String>,

        /// Show only overdue tasks
        #[arg(long)]
        overdue: bool,

        /// Include archived tasks (hidden by default)
        #[arg(long)]
        archived: bool,

        /// Limit results (default: from config, then 50)
        #[arg(long)]
        limit: Option<usize>,

        /// Show all tasks (no limit)
        #[arg(long, conflicts_with = "limit")]
        all: bool,

        /// Sort by field
        #[arg(long, value_enum)]
        sort: Option<SortField>,

        /// Reverse sort order
        #[arg(long)]
        reverse: bool,

        /// Evaluate the filter in this process instead of on the server
        #[arg(long)]
        local: bool,
    },

    /// Add a new task
    #[command(alias = "a")]
    Add {
        /// Task text, parsed for dates, tags and contexts by the server
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Use the text as the title without natural-language parsing
        #[arg(long)]
        raw: bool,
    },

    /// Toggle task(s) to their next status
    #[command(alias = "d")]
    Done {
        /// Task ID(s), i.e. task file paths
        #[arg(required = true)]
        task_ids: Vec<String>,
    },

    /// Archive task(s)
    Archive {
        /// Task ID(s)
        #[arg(required = true)]
        task_ids: Vec<String>,
    },

    /// Delete task(s)
    #[command(alias = "rm")]
    Delete {
        /// Task ID(s)
        #[arg(required = true)]
        task_ids: Vec<String>,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show filter expression syntax
    FilterHelp,

    /// Parse a filter expression and print the query tree
    FilterCheck {
        /// Filter expression
        expression: String,
    },

    /// Check that the TaskNotes API is reachable
    Health,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Sort fields for list command
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Due,
    Priority,
    Title,
    Created,
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration (default)
    Show,

    /// Set a configuration value
    Set {
        /// Key (e.g. api_url, token, output.color, list.limit)
        key: String,

        /// Value
        value: String,
    },

    /// Print the config file path
    Path,
}
