//! API data types for the TaskNotes API.
//!
//! Every endpoint wraps its payload in the same `{success, data, error}`
//! envelope; see [`ApiResponse`].

mod request;
mod response;
mod task;

pub use request::*;
pub use response::*;
pub use task::*;
