//! Health command implementation.

use owo_colors::OwoColorize;
use tasknotes_api_rs::client::TaskNotesClient;

use super::{CommandContext, Result};

/// Checks that the TaskNotes API answers and reports its status.
pub async fn execute(ctx: &CommandContext, client: &TaskNotesClient) -> Result<()> {
    let health = client.health().await?;

    if ctx.json_output {
        let output = serde_json::json!({
            "api_url": client.base_url(),
            "authenticated": client.has_token(),
            "health": health,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        let status = if ctx.use_colors && health.is_ok() {
            health.status.green().to_string()
        } else if ctx.use_colors {
            health.status.yellow().to_string()
        } else {
            health.status.clone()
        };
        println!("{}: {}", client.base_url(), status);
        if let Some(version) = &health.version {
            println!("  version: {}", version);
        }
        if let Some(timestamp) = &health.timestamp {
            println!("  timestamp: {}", timestamp);
        }
    }

    Ok(())
}
