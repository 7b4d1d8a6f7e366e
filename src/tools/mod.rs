/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Every tool is a plain function over a
/// `HabitStorage` implementation; tools that depend on the calendar take
/// `today` as an explicit parameter, resolved once per request by the server
/// from the configured timezone.

pub mod create;
pub mod delete;
pub mod freeze;
pub mod list;
pub mod progress;
pub mod reorder;
pub mod toggle;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use freeze::*;
pub use list::*;
pub use progress::*;
pub use reorder::*;
pub use toggle::*;
pub use update::*;

use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Errors surfaced by the tool layer
///
/// Domain rule violations (bad names, malformed dates, freezing a completed
/// day) and storage failures keep their own taxonomies; the tool layer only
/// adds the request-shape errors it detects itself.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid habit ID: {0}")]
    InvalidHabitId(String),

    #[error("Invalid habit list: must contain every habit exactly once")]
    InvalidHabitList,
}
