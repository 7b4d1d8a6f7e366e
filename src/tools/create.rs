/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub habit_id: String,
    pub name: String,
    pub position: u32,
    pub streak: u32,
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Create a new habit, appended at the end of the user's list
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let position = match storage.max_position()? {
        Some(max) => max + 1,
        None => 0,
    };

    let habit = Habit::new(params.name, position)?;
    storage.create_habit(&habit)?;

    Ok(CreateHabitResponse {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        position: habit.position,
        streak: habit.streak,
        created_at: habit.created_at,
        message: format!("Created habit '{}'. Ready to start your streak!", habit.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_create_appends_position() {
        let storage = SqliteStorage::in_memory().unwrap();

        let first = create_habit(&storage, CreateHabitParams { name: "Read".into() }).unwrap();
        let second = create_habit(&storage, CreateHabitParams { name: "Run".into() }).unwrap();

        assert_eq!(first.position, 0);
        assert_eq!(second.position, 1);
        assert_eq!(first.streak, 0);
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let storage = SqliteStorage::in_memory().unwrap();
        let result = create_habit(&storage, CreateHabitParams { name: "  ".into() });
        assert!(matches!(result, Err(ToolError::Domain(_))));
    }
}
