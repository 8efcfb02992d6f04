//! List command implementation.
//!
//! Lists tasks from the TaskNotes API. The `--filter` expression and the
//! flag-style filters are merged into one query tree, which the server
//! evaluates when it supports the query endpoint.

use std::cmp::Ordering;

use chrono::Local;
use tasknotes_api_rs::client::{filter_locally, EvaluationMode, TaskNotesClient};
use tasknotes_api_rs::models::Task;
use tasknotes_filter_rs::{FilterParser, FilterQuery, LegacyFilter};
use tracing::debug;

use super::config::DEFAULT_LIST_LIMIT;
use super::{CommandContext, Result};
use crate::cli::SortField;
use crate::output::{format_tasks_json, format_tasks_table};

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Filter expression.
    pub filter: Option<String>,
    /// Exact status.
    pub status: Option<String>,
    /// Exact priority.
    pub priority: Option<String>,
    /// Required tags.
    pub tags: Vec<String>,
    /// Required contexts.
    pub contexts: Vec<String>,
    /// Required projects.
    pub projects: Vec<String>,
    /// Show only overdue tasks.
    pub overdue: bool,
    /// Include archived tasks.
    pub archived: bool,
    /// Limit results; `None` shows all.
    pub limit: Option<usize>,
    /// Sort field.
    pub sort: Option<SortField>,
    /// Reverse sort order.
    pub reverse: bool,
    /// Skip the query endpoint and filter in this process.
    pub local: bool,
}

impl ListOptions {
    /// Resolves the limit: `--all` > `--limit` > config > default.
    pub fn resolve_limit(all: bool, flag: Option<usize>, config: Option<usize>) -> Option<usize> {
        if all {
            return None;
        }
        Some(flag.or(config).unwrap_or(DEFAULT_LIST_LIMIT))
    }

    /// Builds the query tree for these options.
    ///
    /// `today` is the `YYYY-MM-DD` date used by `--overdue`. Archived tasks
    /// are hidden unless `--archived` is set or the expression itself tests
    /// `archived`.
    pub fn build_query(&self, today: &str) -> Result<FilterQuery> {
        let parsed = match &self.filter {
            Some(expr) => FilterParser::parse(expr)?,
            None => FilterQuery::match_all(),
        };
        let hide_archived = !self.archived && !parsed.references_property("archived");

        let flags = LegacyFilter {
            status: self.status.clone(),
            priority: self.priority.clone(),
            tags: self.tags.clone(),
            contexts: self.contexts.clone(),
            projects: self.projects.clone(),
            overdue_as_of: self.overdue.then(|| today.to_string()),
            archived: hide_archived.then_some(false),
            ..LegacyFilter::default()
        };

        Ok(flags.merge_into(parsed))
    }
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the filter expression is invalid or the API request fails.
pub async fn execute(
    ctx: &CommandContext,
    opts: &ListOptions,
    client: &TaskNotesClient,
) -> Result<()> {
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let query = opts.build_query(&today)?;
    debug!(?query, "built list query");

    let (tasks, evaluation) = if opts.local {
        let tasks = client.list_tasks().await?;
        (filter_locally(&query, tasks), EvaluationMode::Local)
    } else {
        client.filter_tasks(&query).await?
    };

    debug!(%evaluation, matched = tasks.len(), "filter evaluated");

    let matched = tasks.len();
    let tasks = sort_tasks(tasks, opts.sort, opts.reverse);
    let tasks = apply_limit(tasks, opts.limit);

    if ctx.json_output {
        println!("{}", format_tasks_json(&tasks, matched, evaluation)?);
    } else if !ctx.quiet {
        print!("{}", format_tasks_table(&tasks, ctx.use_colors));
        if tasks.len() < matched {
            eprintln!(
                "({} of {} tasks shown; use --all to see every task)",
                tasks.len(),
                matched
            );
        }
    }

    Ok(())
}

/// Sorts tasks by the given field. Tasks without the field sort last.
fn sort_tasks(mut tasks: Vec<Task>, sort: Option<SortField>, reverse: bool) -> Vec<Task> {
    if let Some(field) = sort {
        tasks.sort_by(|a, b| compare_by(a, b, field));
    }
    if reverse {
        tasks.reverse();
    }
    tasks
}

fn compare_by(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Due => missing_last(a.due_date(), b.due_date()),
        SortField::Priority => priority_rank(a.priority()).cmp(&priority_rank(b.priority())),
        SortField::Title => {
            let a = a.title().map(str::to_lowercase);
            let b = b.title().map(str::to_lowercase);
            missing_last(a, b)
        }
        SortField::Created => missing_last(a.date_created(), b.date_created()),
    }
}

fn missing_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Most urgent first; unknown priority names sort after the known ones.
fn priority_rank(priority: Option<&str>) -> u8 {
    match priority.map(str::to_lowercase).as_deref() {
        Some("urgent") | Some("highest") => 0,
        Some("high") => 1,
        Some("medium") | Some("normal") => 2,
        Some("low") => 3,
        Some("lowest") | Some("none") => 4,
        Some(_) => 5,
        None => 6,
    }
}

fn apply_limit(mut tasks: Vec<Task>, limit: Option<usize>) -> Vec<Task> {
    if let Some(limit) = limit {
        tasks.truncate(limit);
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tasknotes_filter_rs::{Conjunction, FilterError, FilterNode};

    fn tasks() -> Vec<Task> {
        serde_json::from_value(json!([
            {"id": "a.md", "title": "beta", "priority": "low", "due": "2025-03-12"},
            {"id": "b.md", "title": "Alpha", "priority": "urgent"},
            {"id": "c.md", "title": "gamma", "priority": "high", "due": "2025-03-10"}
        ]))
        .unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().filter_map(Task::id).collect()
    }

    #[test]
    fn test_resolve_limit() {
        assert_eq!(ListOptions::resolve_limit(true, Some(5), Some(10)), None);
        assert_eq!(ListOptions::resolve_limit(false, Some(5), Some(10)), Some(5));
        assert_eq!(ListOptions::resolve_limit(false, None, Some(10)), Some(10));
        assert_eq!(
            ListOptions::resolve_limit(false, None, None),
            Some(DEFAULT_LIST_LIMIT)
        );
    }

    #[test]
    fn test_default_query_hides_archived() {
        let query = ListOptions::default().build_query("2025-03-10").unwrap();
        assert_eq!(query.conjunction(), Conjunction::And);
        assert_eq!(query.children().len(), 1);
        let condition = query.children()[0].as_condition().unwrap();
        assert_eq!(condition.property, "archived");
    }

    #[test]
    fn test_archived_flag_yields_match_all() {
        let opts = ListOptions {
            archived: true,
            ..ListOptions::default()
        };
        let query = opts.build_query("2025-03-10").unwrap();
        assert!(query.is_empty());
    }

    #[test]
    fn test_or_filter_is_nested_under_flags() {
        let opts = ListOptions {
            filter: Some("status:open OR status:in-progress".to_string()),
            tags: vec!["work".to_string()],
            ..ListOptions::default()
        };
        let query = opts.build_query("2025-03-10").unwrap();

        assert_eq!(query.conjunction(), Conjunction::And);
        match &query.children()[0] {
            FilterNode::Group(group) => {
                assert_eq!(group.conjunction, Conjunction::Or);
                assert_eq!(group.children.len(), 2);
            }
            other => panic!("Expected nested OR group, got {other:?}"),
        }
        // tags:work and archived:false follow the parsed expression
        assert_eq!(query.children().len(), 3);
    }

    #[test]
    fn test_archived_filter_replaces_implicit_flag() {
        let opts = ListOptions {
            filter: Some("archived:true".to_string()),
            ..ListOptions::default()
        };
        let query = opts.build_query("2025-03-10").unwrap();
        assert_eq!(query.children().len(), 1);

        let archived = json!([{"id": "a.md", "archived": true}, {"id": "b.md"}]);
        let tasks: Vec<Task> = serde_json::from_value(archived).unwrap();
        assert_eq!(ids(&filter_locally(&query, tasks)), vec!["a.md"]);
    }

    #[test]
    fn test_nested_archived_filter_is_detected() {
        let opts = ListOptions {
            filter: Some("status:open AND (archived:false OR tags:keep)".to_string()),
            ..ListOptions::default()
        };
        let query = opts.build_query("2025-03-10").unwrap();
        assert_eq!(query.children().len(), 2);
        assert!(query.children()[0].as_condition().is_some());
        assert!(query.children()[1].as_group().is_some());
    }

    #[test]
    fn test_overdue_uses_today() {
        let opts = ListOptions {
            overdue: true,
            archived: true,
            ..ListOptions::default()
        };
        let query = opts.build_query("2025-03-10").unwrap();
        let due = query.children()[0].as_condition().unwrap();
        assert_eq!(due.property, "due");
        assert_eq!(
            serde_json::to_value(&due.value).unwrap(),
            json!("2025-03-10")
        );
    }

    #[test]
    fn test_invalid_filter_is_filter_error() {
        let opts = ListOptions {
            filter: Some("priorty:high".to_string()),
            ..ListOptions::default()
        };
        match opts.build_query("2025-03-10") {
            Err(super::super::CommandError::Filter(FilterError::UnknownProperty {
                suggestion, ..
            })) => assert_eq!(suggestion.as_deref(), Some("priority")),
            other => panic!("Expected unknown property error, got {other:?}"),
        }
    }

    #[test]
    fn test_sort_by_due_missing_last() {
        let sorted = sort_tasks(tasks(), Some(SortField::Due), false);
        assert_eq!(ids(&sorted), vec!["c.md", "a.md", "b.md"]);
    }

    #[test]
    fn test_sort_by_priority() {
        let sorted = sort_tasks(tasks(), Some(SortField::Priority), false);
        assert_eq!(ids(&sorted), vec!["b.md", "c.md", "a.md"]);
    }

    #[test]
    fn test_sort_by_title_case_insensitive_reversed() {
        let sorted = sort_tasks(tasks(), Some(SortField::Title), true);
        assert_eq!(ids(&sorted), vec!["c.md", "a.md", "b.md"]);
    }

    #[test]
    fn test_apply_limit() {
        assert_eq!(apply_limit(tasks(), Some(2)).len(), 2);
        assert_eq!(apply_limit(tasks(), None).len(), 3);
    }
}
