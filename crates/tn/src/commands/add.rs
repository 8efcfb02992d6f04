//! Add command implementation.
//!
//! By default the text goes to the TaskNotes natural-language endpoint,
//! which extracts dates, tags and contexts. `--raw` creates the task with
//! the text as its title.

use tasknotes_api_rs::client::TaskNotesClient;
use tasknotes_api_rs::models::CreateTaskRequest;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_created_task, format_created_task_json};

/// Options for the add command.
#[derive(Debug)]
pub struct AddOptions {
    /// Task text (words joined with spaces).
    pub text: String,
    /// Skip natural-language parsing.
    pub raw: bool,
}

impl AddOptions {
    /// Joins the positional words into the task text.
    pub fn from_words(words: &[String], raw: bool) -> Result<Self> {
        let text = words.join(" ").trim().to_string();
        if text.is_empty() {
            return Err(CommandError::Config("task text cannot be empty".to_string()));
        }
        Ok(Self { text, raw })
    }
}

/// Executes the add command.
///
/// # Errors
///
/// Returns an error if the API request fails.
pub async fn execute(
    ctx: &CommandContext,
    opts: &AddOptions,
    client: &TaskNotesClient,
) -> Result<()> {
    let (task, parsed) = if opts.raw {
        let task = client.create_task(&CreateTaskRequest::new(&opts.text)).await?;
        (task, None)
    } else {
        let created = client.create_task_from_text(&opts.text).await?;
        (created.task, created.parsed)
    };

    if ctx.json_output {
        println!("{}", format_created_task_json(&task, parsed.as_ref())?);
    } else if !ctx.quiet {
        print!("{}", format_created_task(&task, ctx.use_colors));
    }

    Ok(())
}
