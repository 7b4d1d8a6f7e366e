/// Tool for renaming existing habits
///
/// This module implements the habit_update MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: String,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub habit_id: String,
    pub name: String,
    pub position: u32,
    pub streak: u32,
}

/// Rename an existing habit
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, ToolError> {
    let habit_id = HabitId::from_string(&params.habit_id)
        .map_err(|_| ToolError::InvalidHabitId(params.habit_id.clone()))?;

    let mut habit = storage.get_habit(&habit_id)?;
    habit.rename(params.name)?;
    storage.update_habit(&habit)?;

    Ok(UpdateHabitResponse {
        habit_id: params.habit_id,
        name: habit.name,
        position: habit.position,
        streak: habit.streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Habit;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_update_habit_name() {
        let storage = SqliteStorage::in_memory().unwrap();

        let habit = Habit::new("Old Name".to_string(), 0).unwrap();
        storage.create_habit(&habit).unwrap();

        let result = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: habit.id.to_string(),
                name: "New Name".to_string(),
            },
        );
        assert!(result.is_ok());

        let updated = storage.get_habit(&habit.id).unwrap();
        assert_eq!(updated.name, "New Name");
    }

    #[test]
    fn test_update_rejects_invalid_name() {
        let storage = SqliteStorage::in_memory().unwrap();

        let habit = Habit::new("Keep Me".to_string(), 0).unwrap();
        storage.create_habit(&habit).unwrap();

        let result = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: habit.id.to_string(),
                name: "".to_string(),
            },
        );
        assert!(matches!(result, Err(ToolError::Domain(_))));
        assert_eq!(storage.get_habit(&habit.id).unwrap().name, "Keep Me");
    }

    #[test]
    fn test_update_nonexistent_habit() {
        let storage = SqliteStorage::in_memory().unwrap();

        let result = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: HabitId::new().to_string(),
                name: "New Name".to_string(),
            },
        );
        assert!(result.is_err());
    }
}
