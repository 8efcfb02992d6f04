//! Filter check command implementation.
//!
//! Parses an expression without contacting the server and prints the query
//! tree that `tn list --filter` would send.

use owo_colors::OwoColorize;
use tasknotes_filter_rs::{FilterGroup, FilterNode, FilterParser, FilterQuery};

use super::{CommandContext, Result};

/// Executes the filter-check command.
///
/// # Errors
///
/// Returns the parse error for an invalid expression.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let query = FilterParser::parse(expression)?;

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&query)?);
    } else if !ctx.quiet {
        print!("{}", format_outline(&query, ctx.use_colors));
    }

    Ok(())
}

/// Renders the tree as an indented outline, one node per line.
fn format_outline(query: &FilterQuery, use_colors: bool) -> String {
    let mut output = String::new();
    write_group(&mut output, query.as_group(), 0, use_colors);
    output
}

fn write_group(out: &mut String, group: &FilterGroup, depth: usize, use_colors: bool) {
    let indent = "  ".repeat(depth);
    let label = group.conjunction.as_str().to_uppercase();
    if use_colors {
        let id = format!("({})", group.id);
        out.push_str(&format!("{indent}{} {}\n", label.bold(), id.dimmed()));
    } else {
        out.push_str(&format!("{indent}{label} ({})\n", group.id));
    }

    for child in &group.children {
        match child {
            FilterNode::Group(inner) => write_group(out, inner, depth + 1, use_colors),
            FilterNode::Condition(condition) => {
                let value = condition
                    .value
                    .as_ref()
                    .map(|v| format!(" {:?}", v.to_text()))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "{indent}  {} {}{}\n",
                    condition.property, condition.operator, value
                ));
            }
        }
    }
}
