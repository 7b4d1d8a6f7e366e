/// Tool for reordering the habit list
///
/// This module implements the habit_reorder MCP tool. The client sends the
/// full habit list in its desired order; partial lists are rejected so a
/// stale client cannot silently drop habits to the end.

use std::collections::HashSet;
use serde::{Deserialize, Serialize};

use crate::domain::HabitId;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for reordering habits
#[derive(Debug, Deserialize)]
pub struct ReorderHabitsParams {
    /// Every habit ID, in the desired display order
    pub ordered_ids: Vec<String>,
}

/// Response from reordering habits
#[derive(Debug, Serialize)]
pub struct ReorderHabitsResponse {
    pub count: u32,
}

/// Reassign habit positions to match the given order
pub fn reorder_habits<S: HabitStorage>(
    storage: &S,
    params: ReorderHabitsParams,
) -> Result<ReorderHabitsResponse, ToolError> {
    let mut ordered_ids = Vec::with_capacity(params.ordered_ids.len());
    for id in &params.ordered_ids {
        let habit_id =
            HabitId::from_string(id).map_err(|_| ToolError::InvalidHabitId(id.clone()))?;
        ordered_ids.push(habit_id);
    }

    let existing: HashSet<HabitId> =
        storage.list_habits()?.into_iter().map(|h| h.id).collect();
    let requested: HashSet<HabitId> = ordered_ids.iter().cloned().collect();

    if requested.len() != ordered_ids.len() || requested != existing {
        return Err(ToolError::InvalidHabitList);
    }

    storage.reorder_habits(&ordered_ids)?;

    Ok(ReorderHabitsResponse {
        count: ordered_ids.len() as u32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Habit;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_reorder_full_permutation() {
        let storage = SqliteStorage::in_memory().unwrap();

        let a = Habit::new("A".to_string(), 0).unwrap();
        let b = Habit::new("B".to_string(), 1).unwrap();
        storage.create_habit(&a).unwrap();
        storage.create_habit(&b).unwrap();

        let result = reorder_habits(
            &storage,
            ReorderHabitsParams {
                ordered_ids: vec![b.id.to_string(), a.id.to_string()],
            },
        );
        assert_eq!(result.unwrap().count, 2);

        let habits = storage.list_habits().unwrap();
        assert_eq!(habits[0].name, "B");
    }

    #[test]
    fn test_reorder_rejects_partial_list() {
        let storage = SqliteStorage::in_memory().unwrap();

        let a = Habit::new("A".to_string(), 0).unwrap();
        let b = Habit::new("B".to_string(), 1).unwrap();
        storage.create_habit(&a).unwrap();
        storage.create_habit(&b).unwrap();

        let result = reorder_habits(
            &storage,
            ReorderHabitsParams {
                ordered_ids: vec![a.id.to_string()],
            },
        );
        assert!(matches!(result, Err(ToolError::InvalidHabitList)));
    }

    #[test]
    fn test_reorder_rejects_duplicates_and_strangers() {
        let storage = SqliteStorage::in_memory().unwrap();

        let a = Habit::new("A".to_string(), 0).unwrap();
        storage.create_habit(&a).unwrap();

        let dup = reorder_habits(
            &storage,
            ReorderHabitsParams {
                ordered_ids: vec![a.id.to_string(), a.id.to_string()],
            },
        );
        assert!(matches!(dup, Err(ToolError::InvalidHabitList)));

        let stranger = reorder_habits(
            &storage,
            ReorderHabitsParams {
                ordered_ids: vec![HabitId::new().to_string()],
            },
        );
        assert!(matches!(stranger, Err(ToolError::InvalidHabitList)));
    }
}
