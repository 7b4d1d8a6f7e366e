/// Tool for listing habits
///
/// This module implements the habit_list MCP tool. Listing is the lazy
/// rollover point: day changes are wall-clock-driven, not event-driven, so
/// before reporting each habit this tool renormalizes a stale freeze and
/// fully recomputes the cached streak, writing back only when something
/// actually changed.

use serde::Serialize;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{recompute_habit, Habit};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// One habit in the list response
#[derive(Debug, Serialize)]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub position: u32,
    pub streak: u32,
    pub freeze_date: Option<NaiveDate>,
    pub is_frozen_today: bool,
    pub completed_today: bool,
    pub created_at: DateTime<Utc>,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<HabitSummary>,
}

/// List all habits in user order, rolled over to `today`
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    today: NaiveDate,
) -> Result<ListHabitsResponse, ToolError> {
    let mut summaries = Vec::new();

    for mut habit in storage.list_habits()? {
        let completions = storage.completed_dates(&habit.id)?;

        if recompute_habit(&mut habit, &completions, today) {
            tracing::debug!(
                "Rollover updated habit {}: streak {}, freeze {:?}",
                habit.id,
                habit.streak,
                habit.freeze_date
            );
            storage.update_habit(&habit)?;
        }

        summaries.push(summarize(&habit, today, completions.contains(&today)));
    }

    Ok(ListHabitsResponse { habits: summaries })
}

fn summarize(habit: &Habit, today: NaiveDate, completed_today: bool) -> HabitSummary {
    HabitSummary {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        position: habit.position,
        streak: habit.streak,
        freeze_date: habit.freeze_date,
        is_frozen_today: habit.is_frozen_on(today),
        completed_today,
        created_at: habit.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_list_rolls_over_stale_state() {
        let storage = SqliteStorage::in_memory().unwrap();

        let mut habit = Habit::new("Read".to_string(), 0).unwrap();
        habit.streak = 2;
        habit.freeze_date = Some(d("2026-02-04"));
        storage.create_habit(&habit).unwrap();
        storage.upsert_completion(&habit.id, d("2026-02-02"), true).unwrap();
        storage.upsert_completion(&habit.id, d("2026-02-03"), true).unwrap();

        // Listed on 02-04 the freeze still stands and protects the streak
        let listed = list_habits(&storage, d("2026-02-04")).unwrap();
        assert_eq!(listed.habits[0].streak, 2);
        assert!(listed.habits[0].is_frozen_today);

        // A day later the freeze is consumed and cleared; 02-04 and 02-05
        // are both unprotected gaps now
        let listed = list_habits(&storage, d("2026-02-05")).unwrap();
        assert_eq!(listed.habits[0].streak, 0);
        assert!(!listed.habits[0].is_frozen_today);
        assert_eq!(listed.habits[0].freeze_date, None);

        // The rollover result was persisted, not just reported
        let stored = storage.get_habit(&habit.id).unwrap();
        assert_eq!(stored.streak, 0);
        assert_eq!(stored.freeze_date, None);
    }

    #[test]
    fn test_list_reports_completed_today() {
        let storage = SqliteStorage::in_memory().unwrap();

        let habit = Habit::new("Run".to_string(), 0).unwrap();
        storage.create_habit(&habit).unwrap();
        storage.upsert_completion(&habit.id, d("2026-02-04"), true).unwrap();

        let listed = list_habits(&storage, d("2026-02-04")).unwrap();
        assert!(listed.habits[0].completed_today);
        assert_eq!(listed.habits[0].streak, 1);
    }
}
