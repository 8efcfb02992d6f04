//! Task model for the TaskNotes API.
//!
//! TaskNotes tasks are markdown files with YAML frontmatter, so the set of
//! fields on a task is open-ended: user-defined properties travel alongside
//! the built-in ones. [`Task`] keeps the raw JSON object and offers typed
//! accessors for the fields the CLI uses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tasknotes_filter_rs::TaskRecord;

/// A task as returned by the TaskNotes API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Task {
    fields: Map<String, Value>,
}

impl Task {
    /// Wraps a raw JSON object.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the raw fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consumes the task, returning the raw fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Returns a field by its exact name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    fn str_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn list_field(&self, name: &str) -> Vec<&str> {
        match self.get(name) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::String(single)) => vec![single.as_str()],
            _ => Vec::new(),
        }
    }

    /// The task id, which TaskNotes sets to the task file path.
    pub fn id(&self) -> Option<&str> {
        self.str_field("id").or_else(|| self.str_field("path"))
    }

    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn status(&self) -> Option<&str> {
        self.str_field("status")
    }

    pub fn priority(&self) -> Option<&str> {
        self.str_field("priority")
    }

    /// The raw due value (`YYYY-MM-DD` or an ISO datetime).
    pub fn due(&self) -> Option<&str> {
        self.str_field("due")
    }

    pub fn scheduled(&self) -> Option<&str> {
        self.str_field("scheduled")
    }

    /// The date part of the due value.
    pub fn due_date(&self) -> Option<NaiveDate> {
        let due = self.due()?;
        NaiveDate::parse_from_str(due.get(..10)?, "%Y-%m-%d").ok()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.list_field("tags")
    }

    pub fn contexts(&self) -> Vec<&str> {
        self.list_field("contexts")
    }

    pub fn projects(&self) -> Vec<&str> {
        self.list_field("projects")
    }

    pub fn is_archived(&self) -> bool {
        self.get("archived").and_then(Value::as_bool).unwrap_or(false)
    }

    /// True if the server marks the task completed or it has a completion date.
    pub fn is_completed(&self) -> bool {
        match self.property("status.isCompleted") {
            Some(Value::Bool(done)) => *done,
            Some(Value::String(date)) => !date.is_empty(),
            _ => false,
        }
    }

    /// Estimated time in minutes.
    pub fn time_estimate(&self) -> Option<f64> {
        self.get("timeEstimate").and_then(Value::as_f64)
    }

    /// Creation timestamp, from `dateCreated` or `file.ctime`.
    pub fn date_created(&self) -> Option<&str> {
        self.property("file.ctime").and_then(Value::as_str)
    }
}

/// Filter properties that older servers report under another field name.
const FIELD_FALLBACKS: &[(&str, &str)] = &[
    ("file.ctime", "dateCreated"),
    ("file.mtime", "dateModified"),
    ("status.isCompleted", "completedDate"),
];

impl TaskRecord for Task {
    fn property(&self, name: &str) -> Option<&Value> {
        self.get(name).or_else(|| {
            FIELD_FALLBACKS
                .iter()
                .find(|(property, _)| *property == name)
                .and_then(|(_, field)| self.get(field))
        })
    }
}

impl From<Map<String, Value>> for Task {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_fields(fields)
    }
}
