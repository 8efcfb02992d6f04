//! Filter help command implementation.

use tasknotes_filter_rs::help_text;

use super::{CommandContext, Result};

/// Prints the filter expression reference.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    if ctx.json_output {
        let output = serde_json::json!({ "help": help_text() });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", help_text());
    }
    Ok(())
}
