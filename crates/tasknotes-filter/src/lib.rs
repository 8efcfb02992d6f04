//! Filter expression parser and evaluator for TaskNotes task queries.
//!
//! This crate turns a human-typed filter string into a [`FilterQuery`] tree
//! that can be sent to the TaskNotes query endpoint as JSON, or applied to
//! tasks in memory with the [`FilterEvaluator`].
//!
//! # Supported Syntax
//!
//! ## Conditions
//! - `property:value` - Operator inferred from the property kind
//! - `property:operator:value` - Explicit operator
//! - `title:contains:"two words"` - Quoted values (`"` or `'`, `\` escapes)
//!
//! ## Property Aliases
//! - `tag`, `context`, `project` - `tags`, `contexts`, `projects`
//! - `created`, `modified` - `file.ctime`, `file.mtime`
//! - `completed`, `estimate` - `completedDate`, `timeEstimate`
//!
//! ## Boolean Operators
//! - `AND` - Both sides must match (binds tighter than `OR`)
//! - `OR` - Either side must match
//! - `()` - Grouping
//!
//! Run [`help_text`] for the full property and operator reference.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tasknotes_filter_rs::{evaluate, parse, Conjunction};
//!
//! // Parse a filter expression
//! let query = parse("status:open AND (tag:work OR priority:high)").unwrap();
//! assert_eq!(query.conjunction(), Conjunction::And);
//!
//! // The tree is what the query endpoint receives
//! let body = serde_json::to_value(&query).unwrap();
//! assert_eq!(body["type"], "group");
//!
//! // Or evaluate it locally
//! let tasks = vec![json!({"status": "open", "tags": ["work"]})];
//! assert_eq!(evaluate(&query, &tasks).len(), 1);
//! ```

mod ast;
mod error;
mod evaluator;
mod help;
mod legacy;
mod lexer;
mod parser;
pub mod schema;

pub use ast::{Condition, ConditionValue, Conjunction, FilterGroup, FilterNode, FilterQuery};
pub use error::{FilterError, FilterResult};
pub use evaluator::{evaluate, node_matches, FilterEvaluator, TaskRecord};
pub use help::help_text;
pub use legacy::LegacyFilter;
pub use lexer::{tokenize, FilterToken, Lexer, PositionedToken};
pub use parser::{parse, FilterParser};
pub use schema::{Operator, PropertyDef, ValueKind};
