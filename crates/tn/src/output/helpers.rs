//! Common helper functions for output formatting.

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a TaskNotes priority name for display.
pub fn format_priority(priority: Option<&str>, use_colors: bool) -> String {
    let Some(priority) = priority else {
        return String::new();
    };

    if !use_colors {
        return priority.to_string();
    }

    match priority.to_lowercase().as_str() {
        "urgent" | "highest" => priority.red().bold().to_string(),
        "high" => priority.red().to_string(),
        "medium" | "normal" => priority.yellow().to_string(),
        "low" | "lowest" | "none" => priority.dimmed().to_string(),
        _ => priority.to_string(),
    }
}

/// Formats a status for display.
pub fn format_status(status: Option<&str>, completed: bool, use_colors: bool) -> String {
    let label = status.unwrap_or(if completed { "done" } else { "open" });
    if use_colors && completed {
        label.green().to_string()
    } else {
        label.to_string()
    }
}

/// Formats a due date relative to today.
pub fn format_due(due: Option<NaiveDate>, use_colors: bool) -> String {
    format_due_from(due, Local::now().date_naive(), use_colors)
}

fn format_due_from(due: Option<NaiveDate>, today: NaiveDate, use_colors: bool) -> String {
    let Some(date) = due else {
        return String::new();
    };

    let tomorrow = today + chrono::Duration::days(1);
    let yesterday = today - chrono::Duration::days(1);

    let display = if date == today {
        "Today".to_string()
    } else if date == tomorrow {
        "Tomorrow".to_string()
    } else if date == yesterday {
        "Yesterday".to_string()
    } else if date < today {
        format!("{} days ago", (today - date).num_days())
    } else {
        date.format("%b %d").to_string()
    };

    if use_colors {
        if date < today {
            display.red().to_string()
        } else if date == today {
            display.yellow().to_string()
        } else {
            display
        }
    } else {
        display
    }
}

/// Formats tags as `#tag` words.
pub fn format_tags(tags: &[&str], max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let joined = tags
        .iter()
        .map(|t| format!("#{}", t.trim_start_matches('#')))
        .collect::<Vec<_>>()
        .join(" ");

    truncate_str(&joined, max_len)
}
