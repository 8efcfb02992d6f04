//! Done command implementation.
//!
//! TaskNotes has no dedicated "complete" endpoint; toggling the status moves
//! a task to the next status in the user's cycle, which is "done" for open
//! tasks in the default setup.

use tasknotes_api_rs::client::TaskNotesClient;

use super::{finish_bulk, CommandContext, Result, TaskActionResult};
use crate::output::{format_action_results_json, format_action_results_table};

/// Options for the done command.
#[derive(Debug)]
pub struct DoneOptions {
    /// Task IDs (task file paths).
    pub task_ids: Vec<String>,
}

/// Executes the done command.
///
/// Every task is attempted; the command fails if any one of them failed.
pub async fn execute(
    ctx: &CommandContext,
    opts: &DoneOptions,
    client: &TaskNotesClient,
) -> Result<()> {
    let mut results = Vec::with_capacity(opts.task_ids.len());
    let mut last_error = None;

    for id in &opts.task_ids {
        match client.toggle_status(id).await {
            Ok(task) => results.push(TaskActionResult {
                id: id.clone(),
                title: task.title().map(str::to_string),
                status: task.status().map(str::to_string),
                error: None,
            }),
            Err(err) => {
                results.push(TaskActionResult {
                    id: id.clone(),
                    title: None,
                    status: None,
                    error: Some(err.to_string()),
                });
                last_error = Some(err);
            }
        }
    }

    if ctx.json_output {
        println!("{}", format_action_results_json("done", &results)?);
    } else if !ctx.quiet {
        print!("{}", format_action_results_table("Toggled", &results, ctx.use_colors));
    }

    finish_bulk(last_error)
}
