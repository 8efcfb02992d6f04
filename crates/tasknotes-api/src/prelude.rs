//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the tasknotes-api
//! crate, making it easy for library consumers to import everything they need
//! with a single use statement.
//!
//! # Example
//!
//! ```
//! use tasknotes_api_rs::prelude::*;
//!
//! // Now you have access to:
//! // - TaskNotesClient, TaskNotesClientBuilder, EvaluationMode (API client)
//! // - Error, ApiError, Result (error handling)
//! // - Task, CreateTaskRequest, HealthStatus, etc. (data models)
//! // - FilterQuery, FilterParser (filter expressions)
//! ```

// Client types
pub use crate::client::{
    filter_locally, EvaluationMode, TaskNotesClient, TaskNotesClientBuilder, DEFAULT_BASE_URL,
};

// Error types
pub use crate::error::{ApiError, Error, Result};

// Models
pub use crate::models::{
    ApiResponse, CreateTaskRequest, HealthStatus, NlpCreateRequest, NlpCreateResponse, Task,
    TaskListResponse,
};

// Filter types
pub use tasknotes_filter_rs::{FilterParser, FilterQuery, TaskRecord};
