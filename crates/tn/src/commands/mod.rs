//! Command implementations for the tn CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod add;
pub mod archive;
pub mod completions;
pub mod config;
pub mod delete;
pub mod done;
pub mod filter_check;
pub mod filter_help;
pub mod health;
pub mod list;

use std::env;
use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use tasknotes_api_rs::client::{TaskNotesClient, DEFAULT_BASE_URL};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] tasknotes_filter_rs::FilterError),

    /// API error.
    #[error("API error: {0}")]
    Api(#[from] tasknotes_api_rs::error::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommandError {
    /// Returns the error code string for JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Filter(_) => "FILTER_ERROR",
            CommandError::Api(_) => "API_ERROR",
            CommandError::Config(_) => "CONFIG_ERROR",
            CommandError::Io(_) => "IO_ERROR",
            CommandError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CommandError::Filter(_) | CommandError::Json(_) => 1,
            CommandError::Api(e) if e.exit_code() == 3 => 3,
            CommandError::Api(_) => 2,
            CommandError::Io(_) => 3,
            CommandError::Config(_) => 5,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the config file.
    ///
    /// Colors are off if `--no-color` is given, `NO_COLOR` is set, or the
    /// config disables them.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        let no_color_env = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && !no_color_env && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Resolves the API base URL with priority: flag > env > config > default.
///
/// clap already folds `TASKNOTES_API_URL` into `cli.api_url`.
pub fn resolve_api_url(cli: &Cli, config: &Config) -> String {
    cli.api_url
        .clone()
        .or_else(|| config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Resolves the API token with priority: flag > env > config.
///
/// The TaskNotes API runs without authentication unless the user enables
/// it, so a missing token is not an error.
pub fn resolve_token(cli: &Cli, config: &Config) -> Option<String> {
    cli.token.clone().or_else(|| config.token.clone())
}

/// Builds the API client from the resolved URL and token.
pub fn build_client(cli: &Cli, config: &Config) -> Result<TaskNotesClient> {
    let mut builder = TaskNotesClient::builder(resolve_api_url(cli, config));
    if let Some(token) = resolve_token(cli, config) {
        builder = builder.token(token);
    }
    Ok(builder.build()?)
}

/// Outcome of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Aborted,
}

/// Asks before acting on more than one task.
///
/// Single tasks, `--force`, and non-interactive stdin skip the prompt.
pub fn confirm_bulk_operation(
    action: &str,
    task_ids: &[String],
    force: bool,
    quiet: bool,
) -> Result<ConfirmResult> {
    if force || task_ids.len() <= 1 || !io::stdin().is_terminal() {
        return Ok(ConfirmResult::Confirmed);
    }

    if !quiet {
        eprintln!("About to {action} {} tasks:", task_ids.len());
        for id in task_ids {
            eprintln!("  {id}");
        }
    }

    let confirmed = Confirm::new()
        .with_prompt(format!("{action} {} tasks?", task_ids.len()))
        .default(false)
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e)))?;

    Ok(if confirmed {
        ConfirmResult::Confirmed
    } else {
        ConfirmResult::Aborted
    })
}

/// Result of acting on a single task in a bulk command.
#[derive(Debug)]
pub struct TaskActionResult {
    /// The task ID.
    pub id: String,
    /// The task title, when the server returned the task.
    pub title: Option<String>,
    /// Status after the action, when reported.
    pub status: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl TaskActionResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

/// Turns per-task failures into the command's result.
///
/// The last API error is returned so the exit code reflects it.
pub fn finish_bulk(last_error: Option<tasknotes_api_rs::error::Error>) -> Result<()> {
    match last_error {
        Some(err) => Err(CommandError::Api(err)),
        None => Ok(()),
    }
}
