//! Output formatting utilities for the tn CLI.
//!
//! - [`tasks`] - Task lists, created tasks and per-task action results
//! - [`helpers`] - Common formatting utilities (truncation, priority, due dates)

pub mod helpers;
mod tasks;

pub use tasks::{
    format_action_results_json, format_action_results_table, format_created_task,
    format_created_task_json, format_tasks_json, format_tasks_table,
};
