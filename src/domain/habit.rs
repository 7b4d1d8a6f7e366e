/// Habit entity and related functionality
///
/// This module defines the core Habit struct: a daily habit the user wants
/// to keep a streak on, with its cached streak count and optional single-day
/// streak freeze.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::DomainError;

/// Unique identifier for a habit
///
/// A wrapper around UUID for type safety, so a habit ID can't be confused
/// with any other string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a habit ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HabitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A habit the user wants to complete every day
///
/// `streak` is a cached view over the completion ledger: it is always fully
/// recomputed by the streak engine after any event that can change it, never
/// incremented or decremented in place. `freeze_date` is the at-most-one
/// single-day exemption; once the local day advances past it, the freeze
/// lifecycle rules clear it on the next read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run", "Read 20 pages")
    pub name: String,
    /// User-chosen sort position within the habit list
    pub position: u32,
    /// Cached current streak, derived from the completion ledger
    pub streak: u32,
    /// The one calendar day currently protected by a streak freeze, if any
    pub freeze_date: Option<NaiveDate>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with a zero streak and no freeze.
    pub fn new(name: String, position: u32) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;

        Ok(Self {
            id: HabitId::new(),
            name: name.trim().to_string(),
            position,
            streak: 0,
            freeze_date: None,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// Assumes the data was validated when first stored.
    pub fn from_existing(
        id: HabitId,
        name: String,
        position: u32,
        streak: u32,
        freeze_date: Option<NaiveDate>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            position,
            streak,
            freeze_date,
            created_at,
        }
    }

    /// Rename the habit with validation
    pub fn rename(&mut self, name: String) -> Result<(), DomainError> {
        Self::validate_name(&name)?;
        self.name = name.trim().to_string();
        Ok(())
    }

    /// Whether the habit is frozen for the given day
    pub fn is_frozen_on(&self, date: NaiveDate) -> bool {
        self.freeze_date == Some(date)
    }

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.len() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }
}
