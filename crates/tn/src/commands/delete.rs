//! Delete command implementation.
//!
//! Deleting removes the task file from the vault, so more than one task
//! asks for confirmation unless `--force` is given.

use tasknotes_api_rs::client::TaskNotesClient;

use super::{
    confirm_bulk_operation, finish_bulk, CommandContext, ConfirmResult, Result, TaskActionResult,
};
use crate::output::{format_action_results_json, format_action_results_table};

/// Options for the delete command.
#[derive(Debug)]
pub struct DeleteOptions {
    /// Task IDs (task file paths).
    pub task_ids: Vec<String>,
    /// Skip confirmation prompt.
    pub force: bool,
}

/// Executes the delete command.
///
/// # Errors
///
/// Returns an error if the confirmation prompt fails or any deletion fails.
pub async fn execute(
    ctx: &CommandContext,
    opts: &DeleteOptions,
    client: &TaskNotesClient,
) -> Result<()> {
    match confirm_bulk_operation("delete", &opts.task_ids, opts.force, ctx.quiet)? {
        ConfirmResult::Confirmed => {}
        ConfirmResult::Aborted => {
            if !ctx.quiet {
                eprintln!("Aborted.");
            }
            return Ok(());
        }
    }

    let mut results = Vec::with_capacity(opts.task_ids.len());
    let mut last_error = None;

    for id in &opts.task_ids {
        let error = match client.delete_task(id).await {
            Ok(()) => None,
            Err(err) => {
                let message = err.to_string();
                last_error = Some(err);
                Some(message)
            }
        };
        results.push(TaskActionResult {
            id: id.clone(),
            title: None,
            status: None,
            error,
        });
    }

    if ctx.json_output {
        println!("{}", format_action_results_json("delete", &results)?);
    } else if !ctx.quiet {
        print!("{}", format_action_results_table("Deleted", &results, ctx.use_colors));
    }

    finish_bulk(last_error)
}
