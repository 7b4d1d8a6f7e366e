/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habits and completions. It handles all SQL queries and
/// data conversion.

use std::collections::HashSet;
use std::path::PathBuf;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};

use crate::domain::{first_of_month, last_of_month, Habit, HabitId};
use crate::storage::{migrations, Completion, HabitStorage, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// In-memory storage for tests
    #[cfg(test)]
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Map a habits-table row to a Habit
    fn habit_from_row(row: &rusqlite::Row<'_>) -> Result<Habit, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = HabitId::from_string(&id_str).map_err(|_| {
            rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
        })?;

        let freeze_date: Option<NaiveDate> = row.get(4)?;
        let created_at: DateTime<Utc> = row.get(5)?;

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // position
            row.get(3)?, // streak
            freeze_date,
            created_at,
        ))
    }
}

const HABIT_COLUMNS: &str = "id, name, position, streak, freeze_date, created_at";

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (id, name, position, streak, freeze_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id.to_string(),
                habit.name,
                habit.position,
                habit.streak,
                habit.freeze_date,
                habit.created_at,
            ],
        )?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Get a habit by its ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1"
        ))?;

        let result = stmt.query_row(params![habit_id.to_string()], Self::habit_from_row);

        match result {
            Ok(habit) => Ok(habit),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Persist a habit's mutable fields
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                position = ?3,
                streak = ?4,
                freeze_date = ?5
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                habit.position,
                habit.streak,
                habit.freeze_date,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    /// Delete a habit and its completion ledger
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        // Ledger rows first so the foreign key constraint holds.
        self.conn.execute(
            "DELETE FROM completions WHERE habit_id = ?1",
            params![habit_id.to_string()],
        )?;

        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    /// List all habits ordered by position
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits ORDER BY position ASC, created_at ASC"
        ))?;

        let habit_iter = stmt.query_map([], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            habits.push(habit?);
        }

        Ok(habits)
    }

    fn count_habits(&self) -> Result<u32, StorageError> {
        let count: u32 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habits", [], |row| row.get(0))?;
        Ok(count)
    }

    fn max_position(&self) -> Result<Option<u32>, StorageError> {
        let max: Option<u32> = self
            .conn
            .query_row("SELECT MAX(position) FROM habits", [], |row| row.get(0))?;
        Ok(max)
    }

    /// Assign positions 0..n following the given habit order
    fn reorder_habits(&self, ordered_ids: &[HabitId]) -> Result<(), StorageError> {
        for (index, habit_id) in ordered_ids.iter().enumerate() {
            let rows_affected = self.conn.execute(
                "UPDATE habits SET position = ?2 WHERE id = ?1",
                params![habit_id.to_string(), index as u32],
            )?;

            if rows_affected == 0 {
                return Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                });
            }
        }

        tracing::debug!("Reordered {} habits", ordered_ids.len());
        Ok(())
    }

    /// The stored completed flag for one habit and day, if a row exists
    fn get_completion(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
    ) -> Result<Option<bool>, StorageError> {
        let result = self.conn.query_row(
            "SELECT completed FROM completions WHERE habit_id = ?1 AND date = ?2",
            params![habit_id.to_string(), date],
            |row| row.get::<_, bool>(0),
        );

        match result {
            Ok(completed) => Ok(Some(completed)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Insert or overwrite the completion flag for one habit and day
    fn upsert_completion(
        &self,
        habit_id: &HabitId,
        date: NaiveDate,
        completed: bool,
    ) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO completions (habit_id, date, completed, logged_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![habit_id.to_string(), date, completed, Utc::now()],
        )?;

        tracing::debug!(
            "Set completion for habit {} on {}: {}",
            habit_id,
            date,
            completed
        );
        Ok(())
    }

    /// All dates marked completed for a habit
    fn completed_dates(&self, habit_id: &HabitId) -> Result<HashSet<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM completions WHERE habit_id = ?1 AND completed = 1",
        )?;

        let date_iter = stmt.query_map(params![habit_id.to_string()], |row| {
            row.get::<_, NaiveDate>(0)
        })?;

        let mut dates = HashSet::new();
        for date in date_iter {
            dates.insert(date?);
        }

        Ok(dates)
    }

    /// All completed entries within a calendar month, across habits
    fn completions_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<Completion>, StorageError> {
        let (Some(start), Some(end)) = (first_of_month(year, month), last_of_month(year, month))
        else {
            return Ok(Vec::new());
        };

        let mut stmt = self.conn.prepare(
            "SELECT habit_id, date, completed FROM completions
             WHERE date BETWEEN ?1 AND ?2 AND completed = 1
             ORDER BY date ASC",
        )?;

        let completion_iter = stmt.query_map(params![start, end], |row| {
            let habit_id_str: String = row.get(0)?;
            let habit_id = HabitId::from_string(&habit_id_str).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "Invalid UUID".to_string(), rusqlite::types::Type::Text)
            })?;

            Ok(Completion {
                habit_id,
                date: row.get(1)?,
                completed: row.get(2)?,
            })
        })?;

        let mut completions = Vec::new();
        for completion in completion_iter {
            completions.push(completion?);
        }

        Ok(completions)
    }

    /// Count of completed entries within a calendar month, across habits
    fn count_completions_in_month(&self, year: i32, month: u32) -> Result<u32, StorageError> {
        let (Some(start), Some(end)) = (first_of_month(year, month), last_of_month(year, month))
        else {
            return Ok(0);
        };

        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM completions WHERE date BETWEEN ?1 AND ?2 AND completed = 1",
            params![start, end],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}
