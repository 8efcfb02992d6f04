//! HTTP client wrapper for the TaskNotes API.
//!
//! The TaskNotes plugin serves its API from inside Obsidian, by default on
//! `http://localhost:8080`. Authentication is an optional bearer token.

use std::fmt;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tasknotes_filter_rs::{FilterEvaluator, FilterQuery};
use tracing::{debug, warn};

use crate::error::{ApiError, Error, Result};
use crate::models::{
    ApiResponse, CreateTaskRequest, HealthStatus, NlpCreateRequest, NlpCreateResponse, Task,
    TaskList,
};

/// Default base URL of the TaskNotes HTTP API.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Path of the server-side filter endpoint.
const QUERY_ENDPOINT: &[&str] = &["api", "tasks", "query"];

/// Where a filter query was evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// The server ran the query.
    Remote,
    /// All tasks were fetched and filtered in this process.
    Local,
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationMode::Remote => write!(f, "remote"),
            EvaluationMode::Local => write!(f, "local"),
        }
    }
}

/// Builder for configuring a [`TaskNotesClient`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tasknotes_api_rs::client::TaskNotesClient;
///
/// let client = TaskNotesClient::builder("http://localhost:8080")
///     .token("secret")
///     .request_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// assert_eq!(client.base_url(), "http://localhost:8080/");
/// ```
#[derive(Clone)]
pub struct TaskNotesClientBuilder {
    base_url: String,
    token: Option<String>,
    request_timeout: Duration,
}

impl TaskNotesClientBuilder {
    /// Creates a new builder for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sends `Authorization: Bearer <token>` with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the timeout for each HTTP request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL does not parse or cannot
    /// carry a path, and [`Error::Http`] if the HTTP client fails to build.
    pub fn build(self) -> Result<TaskNotesClient> {
        let base_url = Url::parse(&self.base_url).map_err(|e| Error::InvalidUrl {
            url: self.base_url.clone(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: self.base_url,
                message: "URL cannot have a path".to_string(),
            });
        }

        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(TaskNotesClient {
            token: self.token,
            http_client,
            base_url,
            request_timeout: self.request_timeout,
        })
    }
}

impl fmt::Debug for TaskNotesClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNotesClientBuilder")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Client for interacting with the TaskNotes API.
#[derive(Clone)]
pub struct TaskNotesClient {
    token: Option<String>,
    http_client: reqwest::Client,
    base_url: Url,
    request_timeout: Duration,
}

impl TaskNotesClient {
    /// Creates a client for the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// See [`TaskNotesClientBuilder::build`].
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        TaskNotesClientBuilder::new(base_url).build()
    }

    /// Creates a builder for configuring the client.
    pub fn builder(base_url: impl Into<String>) -> TaskNotesClientBuilder {
        TaskNotesClientBuilder::new(base_url)
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Returns true if a bearer token is configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns the configured request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    // ==================== Endpoints ====================

    /// Checks that the server is reachable.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.get(&["api", "health"]).await
    }

    /// Fetches every task.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let list: TaskList = self.get(&["api", "tasks"]).await?;
        Ok(list.into_tasks())
    }

    /// Fetches one task by id (its file path).
    pub async fn get_task(&self, id: &str) -> Result<Task> {
        self.get(&["api", "tasks", id])
            .await
            .map_err(|e| not_found_as("task", id, e))
    }

    /// Creates a task from explicit fields.
    pub async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.post(&["api", "tasks"], Some(request)).await
    }

    /// Creates a task from a natural-language line, parsed by the server.
    pub async fn create_task_from_text(&self, text: &str) -> Result<NlpCreateResponse> {
        self.post(&["api", "nlp", "create"], Some(&NlpCreateRequest::new(text)))
            .await
    }

    /// Cycles the task to its next status (e.g. open to done).
    pub async fn toggle_status(&self, id: &str) -> Result<Task> {
        self.post::<Task, ()>(&["api", "tasks", id, "toggle-status"], None)
            .await
            .map_err(|e| not_found_as("task", id, e))
    }

    /// Archives (or unarchives) a task.
    pub async fn archive_task(&self, id: &str) -> Result<Task> {
        self.post::<Task, ()>(&["api", "tasks", id, "archive"], None)
            .await
            .map_err(|e| not_found_as("task", id, e))
    }

    /// Deletes a task file.
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        self.delete(&["api", "tasks", id])
            .await
            .map_err(|e| not_found_as("task", id, e))
    }

    /// Runs a filter query on the server.
    ///
    /// The query tree is sent verbatim as the request body.
    pub async fn query_tasks(&self, query: &FilterQuery) -> Result<Vec<Task>> {
        let list: TaskList = self
            .post(QUERY_ENDPOINT, Some(query))
            .await
            .map_err(unsupported_as_query)?;
        Ok(list.into_tasks())
    }

    /// Runs a filter query, evaluating it locally if the server cannot.
    pub async fn filter_tasks(&self, query: &FilterQuery) -> Result<(Vec<Task>, EvaluationMode)> {
        match self.query_tasks(query).await {
            Ok(tasks) => Ok((tasks, EvaluationMode::Remote)),
            Err(err) if err.is_unsupported() => {
                warn!(error = %err, "query endpoint unavailable, filtering locally");
                let tasks = self.list_tasks().await?;
                Ok((filter_locally(query, tasks), EvaluationMode::Local))
            }
            Err(err) => Err(err),
        }
    }

    // ==================== HTTP ====================

    /// Builds an endpoint URL; each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl {
                url: self.base_url.to_string(),
                message: "URL cannot have a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "sending request");
        let request = self.http_client.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Performs a GET request to the given endpoint.
    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments)?;
        let response = send(self.request(Method::GET, url)).await?;
        self.handle_response(response).await
    }

    /// Performs a POST request, with a JSON body if one is given.
    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.endpoint(segments)?;
        let mut request = self.request(Method::POST, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = send(request).await?;
        self.handle_response(response).await
    }

    /// Performs a DELETE request to the given endpoint.
    async fn delete(&self, segments: &[&str]) -> Result<()> {
        let url = self.endpoint(segments)?;
        let response = send(self.request(Method::DELETE, url)).await?;
        self.handle_empty_response(response).await
    }

    /// Handles the HTTP response, unwrapping the envelope.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
            return envelope.into_result();
        }

        Err(self.parse_error_response(response).await)
    }

    /// Handles responses whose body carries nothing we need.
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            return Ok(());
        }

        Err(self.parse_error_response(response).await)
    }

    /// Parses an error response into our error types.
    async fn parse_error_response(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();
        let path = response.url().path().to_string();

        let body = response.text().await.unwrap_or_default();
        // Prefer the envelope's error message over the raw body.
        let message = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or(body);
        let message_or = |fallback: &str| {
            if message.is_empty() {
                fallback.to_string()
            } else {
                message.clone()
            }
        };

        let api_error = match status_code {
            401 | 403 => ApiError::Auth {
                message: message_or("Authentication failed"),
            },
            404 => ApiError::NotFound {
                resource: "endpoint".to_string(),
                id: path,
            },
            400 | 422 => ApiError::Validation {
                message: message_or("Bad request"),
            },
            _ => ApiError::Http {
                status: status_code,
                message: message_or(status.canonical_reason().unwrap_or("Unknown error")),
            },
        };

        Error::Api(api_error)
    }
}

impl fmt::Debug for TaskNotesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskNotesClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("http_client", &self.http_client)
            .finish()
    }
}

/// Filters tasks in this process with the same semantics as the server.
pub fn filter_locally(query: &FilterQuery, tasks: Vec<Task>) -> Vec<Task> {
    let evaluator = FilterEvaluator::new(query);
    tasks.into_iter().filter(|task| evaluator.matches(task)).collect()
}

async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
    request.send().await.map_err(|e| {
        if e.is_connect() || e.is_timeout() {
            Error::Api(ApiError::Network {
                message: e.to_string(),
            })
        } else {
            Error::Http(e)
        }
    })
}

/// Names the missing resource in a 404 from a per-task endpoint.
fn not_found_as(resource: &str, id: &str, err: Error) -> Error {
    match err {
        Error::Api(ApiError::NotFound { .. }) => Error::Api(ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }),
        other => other,
    }
}

/// Reports a missing query route as an unsupported endpoint.
fn unsupported_as_query(err: Error) -> Error {
    if !err.is_unsupported() {
        return err;
    }
    let status = match &err {
        Error::Api(ApiError::Http { status, .. }) => *status,
        _ => 404,
    };
    Error::Api(ApiError::Unsupported {
        endpoint: format!("/{}", QUERY_ENDPOINT.join("/")),
        status,
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
