/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion is permanent
/// and takes the habit's completion ledger with it.

use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub habit_id: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub habit_id: String,
    pub message: String,
}

/// Delete a habit and its completion history
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, ToolError> {
    let habit_id = HabitId::from_string(&params.habit_id)
        .map_err(|_| ToolError::InvalidHabitId(params.habit_id.clone()))?;

    let habit = storage.get_habit(&habit_id)?;
    storage.delete_habit(&habit_id)?;

    Ok(DeleteHabitResponse {
        habit_id: params.habit_id,
        message: format!("Deleted habit '{}' and its completion history", habit.name),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Habit;
    use crate::storage::SqliteStorage;
    use crate::storage::StorageError;

    #[test]
    fn test_delete_habit() {
        let storage = SqliteStorage::in_memory().unwrap();

        let habit = Habit::new("Ephemeral".to_string(), 0).unwrap();
        storage.create_habit(&habit).unwrap();

        let result = delete_habit(
            &storage,
            DeleteHabitParams { habit_id: habit.id.to_string() },
        );
        assert!(result.is_ok());

        assert!(matches!(
            storage.get_habit(&habit.id),
            Err(StorageError::HabitNotFound { .. })
        ));
    }

    #[test]
    fn test_delete_unknown_habit() {
        let storage = SqliteStorage::in_memory().unwrap();

        let result = delete_habit(
            &storage,
            DeleteHabitParams { habit_id: HabitId::new().to_string() },
        );
        assert!(matches!(result, Err(ToolError::Storage(_))));
    }
}
