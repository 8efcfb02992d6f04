//! Response payloads for the TaskNotes API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::task::Task;
use crate::error::{Error, Result};

/// The envelope around every TaskNotes API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Unwraps the payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Envelope`] when the server reported a failure or a
    /// successful response carries no data.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(Error::Envelope {
                message: self
                    .error
                    .unwrap_or_else(|| "request failed without a message".to_string()),
            });
        }
        self.data.ok_or_else(|| Error::Envelope {
            message: "response is missing data".to_string(),
        })
    }
}

/// A page of tasks from `GET /api/tasks` or `POST /api/tasks/query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Number of tasks before pagination, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,

    /// Number of tasks matching the query, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<usize>,
}

/// Task list payloads come either as a bare array or wrapped with counts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TaskList {
    Bare(Vec<Task>),
    Wrapped(TaskListResponse),
}

impl TaskList {
    pub(crate) fn into_tasks(self) -> Vec<Task> {
        match self {
            TaskList::Bare(tasks) => tasks,
            TaskList::Wrapped(page) => page.tasks,
        }
    }
}

/// Result of `POST /api/nlp/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NlpCreateResponse {
    pub task: Task,

    /// What the server extracted from the text (dates, tags, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
}

/// Result of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self.status.as_str(), "ok" | "healthy")
    }
}
