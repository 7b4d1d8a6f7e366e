/// Domain module containing core business logic and data types
///
/// This module holds the Habit entity, the calendar utilities, and the
/// streak engine with its freeze lifecycle rules. Everything here is pure:
/// no clock reads, no I/O.

pub mod date;
pub mod habit;
pub mod streak;

// Re-export public types for easy access
pub use date::*;
pub use habit::*;
pub use streak::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Cannot freeze {0}: the day is already completed")]
    FreezeOnCompletedDay(chrono::NaiveDate),
}
