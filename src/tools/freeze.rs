/// Tool for toggling a streak freeze
///
/// This module implements the freeze_toggle MCP tool. A freeze is a
/// one-time, single-day exemption for today: while it stands, an
/// uncompleted today does not break the streak. Freezing a day that is
/// already completed is rejected, since that day needs no protection.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::{compute_streak, DomainError, HabitId};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for toggling the freeze
#[derive(Debug, Deserialize)]
pub struct ToggleFreezeParams {
    pub habit_id: String,
}

/// Response from toggling the freeze
#[derive(Debug, Serialize)]
pub struct ToggleFreezeResponse {
    pub habit_id: String,
    pub freeze_date: Option<NaiveDate>,
    pub is_frozen_today: bool,
    pub streak: u32,
}

/// Flip the freeze for today on or off
pub fn toggle_freeze<S: HabitStorage>(
    storage: &S,
    params: ToggleFreezeParams,
    today: NaiveDate,
) -> Result<ToggleFreezeResponse, ToolError> {
    let habit_id = HabitId::from_string(&params.habit_id)
        .map_err(|_| ToolError::InvalidHabitId(params.habit_id.clone()))?;

    let mut habit = storage.get_habit(&habit_id)?;
    let completions = storage.completed_dates(&habit_id)?;

    if habit.is_frozen_on(today) {
        habit.freeze_date = None;
    } else {
        if completions.contains(&today) {
            return Err(DomainError::FreezeOnCompletedDay(today).into());
        }
        // A freeze for any earlier day is stale by definition; setting
        // today's replaces it.
        habit.freeze_date = Some(today);
    }

    habit.streak = compute_streak(&completions, today, habit.freeze_date);
    storage.update_habit(&habit)?;

    tracing::debug!(
        "Freeze for habit {} now {:?}; streak {}",
        habit.id,
        habit.freeze_date,
        habit.streak
    );

    Ok(ToggleFreezeResponse {
        habit_id: params.habit_id,
        freeze_date: habit.freeze_date,
        is_frozen_today: habit.is_frozen_on(today),
        streak: habit.streak,
    })
}
