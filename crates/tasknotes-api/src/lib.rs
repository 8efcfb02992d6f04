//! TaskNotes API client library
//!
//! # Quick Start
//!
//! For convenient imports, use the prelude:
//!
//! ```
//! use tasknotes_api_rs::prelude::*;
//! ```
//!
//! This re-exports the most commonly used types including [`TaskNotesClient`](client::TaskNotesClient),
//! error types, request/response models, and the filter query types.

pub mod client;
pub mod error;
pub mod models;
pub mod prelude;
