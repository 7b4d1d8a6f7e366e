/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving habits and their per-day
/// completion ledger.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use std::collections::HashSet;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// A completion ledger entry for one habit on one calendar day
///
/// A row with `completed == false` is kept so a toggle can flip it back,
/// but it is equivalent to absence as far as the streak engine is concerned.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub habit_id: HabitId,
    pub date: NaiveDate,
    pub completed: bool,
}

/// Trait defining the storage interface for habits and completions
///
/// This keeps the tool layer independent of SQLite and lets tests swap in
/// scratch databases.
pub trait HabitStorage {
    /// Create a new habit
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Persist a habit's mutable fields (name, position, streak, freeze date)
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and its completion ledger
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List all habits ordered by position
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Number of habits
    fn count_habits(&self) -> Result<u32, StorageError>;

    /// Highest position currently in use, if any habit exists
    fn max_position(&self) -> Result<Option<u32>, StorageError>;

    /// Assign positions 0..n following the given habit order
    fn reorder_habits(&self, ordered_ids: &[HabitId]) -> Result<(), StorageError>;

    /// The stored completed flag for one habit and day, if a row exists
    fn get_completion(&self, habit_id: &HabitId, date: NaiveDate)
        -> Result<Option<bool>, StorageError>;

    /// Insert or overwrite the completion flag for one habit and day
    fn upsert_completion(&self, habit_id: &HabitId, date: NaiveDate, completed: bool)
        -> Result<(), StorageError>;

    /// All dates marked completed for a habit, as the unordered set the
    /// streak engine consumes
    fn completed_dates(&self, habit_id: &HabitId) -> Result<HashSet<NaiveDate>, StorageError>;

    /// All completed entries within a calendar month, across habits
    fn completions_in_month(&self, year: i32, month: u32)
        -> Result<Vec<Completion>, StorageError>;

    /// Count of completed entries within a calendar month, across habits
    fn count_completions_in_month(&self, year: i32, month: u32) -> Result<u32, StorageError>;
}
