//! Request bodies for the TaskNotes API.

use serde::{Deserialize, Serialize};

/// Body for `POST /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,

    /// Due date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,

    /// Scheduled date (`YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,

    /// Estimated time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<u32>,

    /// Body text of the task note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Body for `POST /api/nlp/create`: a natural-language task line such as
/// `"Call mom tomorrow @home #family"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NlpCreateRequest {
    pub text: String,
}

impl NlpCreateRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_minimal() {
        let req = CreateTaskRequest::new("Buy milk");
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"title": "Buy milk"}));
    }

    #[test]
    fn test_create_request_camel_case() {
        let req = CreateTaskRequest {
            priority: Some("high".to_string()),
            tags: vec!["errands".to_string()],
            time_estimate: Some(15),
            ..CreateTaskRequest::new("Buy milk")
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "title": "Buy milk",
                "priority": "high",
                "tags": ["errands"],
                "timeEstimate": 15
            })
        );
    }

    #[test]
    fn test_nlp_request() {
        let req = NlpCreateRequest::new("Call mom tomorrow");
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"text":"Call mom tomorrow"}"#
        );
    }
}
