//! Archive command implementation.

use tasknotes_api_rs::client::TaskNotesClient;

use super::{finish_bulk, CommandContext, Result, TaskActionResult};
use crate::output::{format_action_results_json, format_action_results_table};

/// Options for the archive command.
#[derive(Debug)]
pub struct ArchiveOptions {
    /// Task IDs (task file paths).
    pub task_ids: Vec<String>,
}

/// Executes the archive command.
pub async fn execute(
    ctx: &CommandContext,
    opts: &ArchiveOptions,
    client: &TaskNotesClient,
) -> Result<()> {
    let mut results = Vec::with_capacity(opts.task_ids.len());
    let mut last_error = None;

    for id in &opts.task_ids {
        match client.archive_task(id).await {
            Ok(task) => results.push(TaskActionResult {
                id: id.clone(),
                title: task.title().map(str::to_string),
                status: None,
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
        println!("{}", format_action_results_json("archive", &results)?);
    } else if !ctx.quiet {
        print!("{}", format_action_results_table("Archived", &results, ctx.use_colors));
    }

    finish_bulk(last_error)
}
