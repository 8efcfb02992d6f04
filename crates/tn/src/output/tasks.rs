//! Task output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tasknotes_api_rs::client::EvaluationMode;
use tasknotes_api_rs::models::Task;

use super::helpers::{format_due, format_priority, format_status, format_tags, truncate_str};
use crate::commands::TaskActionResult;

/// JSON output structure for list command.
#[derive(Serialize)]
pub struct ListOutput<'a> {
    pub tasks: &'a [Task],
    /// Tasks shown.
    pub count: usize,
    /// Tasks matched before the limit was applied.
    pub matched: usize,
    /// Where the filter was evaluated.
    pub evaluation: EvaluationMode,
}

/// JSON output structure for a created task.
#[derive(Serialize)]
pub struct CreatedTaskOutput<'a> {
    pub task: &'a Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<&'a Value>,
}

/// JSON output for a per-task action.
#[derive(Serialize)]
pub struct ActionOutput<'a> {
    pub action: &'a str,
    pub results: Vec<ActionResultOutput<'a>>,
    pub succeeded: usize,
    pub failed: usize,
}

/// JSON output for one task in a per-task action.
#[derive(Serialize)]
pub struct ActionResultOutput<'a> {
    pub id: &'a str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
}

/// Formats tasks as JSON.
pub fn format_tasks_json(
    tasks: &[Task],
    matched: usize,
    evaluation: EvaluationMode,
) -> Result<String, serde_json::Error> {
    let output = ListOutput {
        tasks,
        count: tasks.len(),
        matched,
        evaluation,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats tasks as a table.
pub fn format_tasks_table(tasks: &[Task], use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!(
        "{:<12} {:<8} {:<12} {:<20} {:<32} {}",
        "Status", "Pri", "Due", "Tags", "Title", "ID"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for task in tasks {
        let status = format_status(task.status(), task.is_completed(), use_colors);
        let priority = format_priority(task.priority(), use_colors);
        let due = format_due(task.due_date(), use_colors);
        let tags = format_tags(&task.tags(), 20);
        let title = truncate_str(task.title().unwrap_or("(untitled)"), 32);
        let id = task.id().unwrap_or_default();

        let line = format!(
            "{:<12} {:<8} {:<12} {:<20} {:<32} {}",
            status, priority, due, tags, title, id
        );
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Formats a created task as JSON.
pub fn format_created_task_json(
    task: &Task,
    parsed: Option<&Value>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CreatedTaskOutput { task, parsed })
}

/// Formats a created task for the terminal.
pub fn format_created_task(task: &Task, use_colors: bool) -> String {
    let title = task.title().unwrap_or("(untitled)");
    let mut output = if use_colors {
        format!("{} {}\n", "Created:".green(), title.bold())
    } else {
        format!("Created: {}\n", title)
    };

    if let Some(id) = task.id() {
        output.push_str(&format!("  id: {}\n", id));
    }
    if let Some(due) = task.due() {
        output.push_str(&format!("  due: {}\n", due));
    }
    if let Some(scheduled) = task.scheduled() {
        output.push_str(&format!("  scheduled: {}\n", scheduled));
    }
    let tags = task.tags();
    if !tags.is_empty() {
        output.push_str(&format!("  tags: {}\n", format_tags(&tags, 60)));
    }
    output
}

/// Formats the per-task results of `done`, `archive` or `delete` as JSON.
pub fn format_action_results_json(
    action: &str,
    results: &[TaskActionResult],
) -> Result<String, serde_json::Error> {
    let succeeded = results.iter().filter(|r| r.success()).count();
    let output = ActionOutput {
        action,
        results: results
            .iter()
            .map(|r| ActionResultOutput {
                id: &r.id,
                success: r.success(),
                title: r.title.as_deref(),
                status: r.status.as_deref(),
                error: r.error.as_deref(),
            })
            .collect(),
        succeeded,
        failed: results.len() - succeeded,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats the per-task results of `done`, `archive` or `delete`.
///
/// `verb` is the past tense shown for successes, e.g. "Archived".
pub fn format_action_results_table(
    verb: &str,
    results: &[TaskActionResult],
    use_colors: bool,
) -> String {
    let mut output = String::new();

    for result in results {
        let name = result.title.as_deref().unwrap_or(&result.id);
        let line = match (&result.error, &result.status) {
            (Some(error), _) if use_colors => {
                format!("{} {}: {}", "Failed:".red(), result.id, error)
            }
            (Some(error), _) => format!("Failed: {}: {}", result.id, error),
            (None, Some(status)) => format!("{}: {} ({})", verb, name, status),
            (None, None) => format!("{}: {}", verb, name),
        };
        output.push_str(&line);
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tasks() -> Vec<Task> {
        serde_json::from_value(json!([
            {"id": "Tasks/a.md", "title": "Write report", "status": "open", "priority": "high", "tags": ["work"]},
            {"id": "Tasks/b.md", "title": "Buy milk"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_tasks_table_plain() {
        let table = format_tasks_table(&tasks(), false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Status"));
        assert!(lines[1].contains("Write report"));
        assert!(lines[1].contains("#work"));
        assert!(lines[1].ends_with("Tasks/a.md"));
        assert!(lines[2].starts_with("open"));
    }

    #[test]
    fn test_tasks_table_empty() {
        assert_eq!(format_tasks_table(&[], false), "No tasks found.\n");
    }

    #[test]
    fn test_tasks_json_shape() {
        let tasks = tasks();
        let out = format_tasks_json(&tasks[..1], 2, EvaluationMode::Local).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["matched"], 2);
        assert_eq!(value["evaluation"], "local");
        assert_eq!(value["tasks"][0]["title"], "Write report");
    }

    #[test]
    fn test_action_results() {
        let results = vec![
            TaskActionResult {
                id: "a.md".to_string(),
                title: Some("A".to_string()),
                status: Some("done".to_string()),
                error: None,
            },
            TaskActionResult {
                id: "b.md".to_string(),
                title: None,
                status: None,
                error: Some("task not found: b.md".to_string()),
            },
        ];

        let table = format_action_results_table("Toggled", &results, false);
        assert_eq!(table, "Toggled: A (done)\nFailed: b.md: task not found: b.md\n");

        let value: Value =
            serde_json::from_str(&format_action_results_json("done", &results).unwrap()).unwrap();
        assert_eq!(value["succeeded"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["results"][1]["success"], false);
        assert!(value["results"][0].get("error").is_none());
    }

    #[test]
    fn test_created_task_plain() {
        let task: Task = serde_json::from_value(json!({
            "id": "Tasks/Buy milk.md",
            "title": "Buy milk",
            "due": "2025-03-11",
            "tags": ["errands"]
        }))
        .unwrap();
        let out = format_created_task(&task, false);
        assert_eq!(
            out,
            "Created: Buy milk\n  id: Tasks/Buy milk.md\n  due: 2025-03-11\n  tags: #errands\n"
        );
    }
}
