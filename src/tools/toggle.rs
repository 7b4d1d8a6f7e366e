/// Tool for toggling habit completions
///
/// This module implements the completion_toggle MCP tool: flip the
/// completed flag for one habit on one calendar day (today or a backfilled
/// past day), then derive the streak fresh from the full ledger.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::{parse_date_key, recompute_habit, HabitId};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for toggling a completion
#[derive(Debug, Deserialize)]
pub struct ToggleCompletionParams {
    pub habit_id: String,
    /// Calendar day to flip, as YYYY-MM-DD
    pub date: String,
}

/// Response from toggling a completion
#[derive(Debug, Serialize)]
pub struct ToggleCompletionResponse {
    pub habit_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub streak: u32,
}

/// Toggle the completion flag for a habit on a given day
///
/// An absent ledger row toggles to completed. After the flip the habit's
/// freeze is renormalized against `today` and the streak recomputed from
/// the complete ledger, which is what makes backfilling an old missing day
/// retroactively extend the streak.
pub fn toggle_completion<S: HabitStorage>(
    storage: &S,
    params: ToggleCompletionParams,
    today: NaiveDate,
) -> Result<ToggleCompletionResponse, ToolError> {
    let habit_id = HabitId::from_string(&params.habit_id)
        .map_err(|_| ToolError::InvalidHabitId(params.habit_id.clone()))?;
    let date = parse_date_key(&params.date)?;

    let mut habit = storage.get_habit(&habit_id)?;

    let completed = match storage.get_completion(&habit_id, date)? {
        Some(existing) => !existing,
        None => true,
    };
    storage.upsert_completion(&habit_id, date, completed)?;

    let completions = storage.completed_dates(&habit_id)?;
    recompute_habit(&mut habit, &completions, today);
    storage.update_habit(&habit)?;

    tracing::debug!(
        "Toggled habit {} on {} to {}; streak now {}",
        habit.id,
        date,
        completed,
        habit.streak
    );

    Ok(ToggleCompletionResponse {
        habit_id: params.habit_id,
        date,
        completed,
        streak: habit.streak,
    })
}
