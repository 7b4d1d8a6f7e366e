/// Tools for monthly views
///
/// This module implements the completions_month and progress_month MCP
/// tools: the per-day completion grid for a calendar month, and the
/// aggregate completion percentage over every habit-day cell in it.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::{days_in_month, parse_month_key};
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for both monthly tools
#[derive(Debug, Deserialize)]
pub struct MonthParams {
    /// Calendar month as YYYY-MM
    pub month: String,
}

/// One completed habit-day cell
#[derive(Debug, Serialize)]
pub struct CompletionCell {
    pub habit_id: String,
    pub date: NaiveDate,
}

/// Response from completions_month
#[derive(Debug, Serialize)]
pub struct MonthCompletionsResponse {
    pub month: String,
    pub completions: Vec<CompletionCell>,
}

/// Response from progress_month
#[derive(Debug, Serialize)]
pub struct MonthProgressResponse {
    pub month: String,
    /// habit count x days in the month
    pub total_checks: u32,
    pub completed_checks: u32,
    /// completed_checks / total_checks, rounded to whole percent
    pub percentage: u32,
}

/// All completed habit-days within a month
pub fn completions_month<S: HabitStorage>(
    storage: &S,
    params: MonthParams,
) -> Result<MonthCompletionsResponse, ToolError> {
    let (year, month) = parse_month_key(&params.month)?;

    let completions = storage
        .completions_in_month(year, month)?
        .into_iter()
        .map(|c| CompletionCell {
            habit_id: c.habit_id.to_string(),
            date: c.date,
        })
        .collect();

    Ok(MonthCompletionsResponse {
        month: params.month,
        completions,
    })
}

/// Aggregate completion percentage for a month
pub fn progress_month<S: HabitStorage>(
    storage: &S,
    params: MonthParams,
) -> Result<MonthProgressResponse, ToolError> {
    let (year, month) = parse_month_key(&params.month)?;

    let total_checks = storage.count_habits()? * days_in_month(year, month);
    let completed_checks = storage.count_completions_in_month(year, month)?;

    let percentage = if total_checks > 0 {
        ((completed_checks as f64 / total_checks as f64) * 100.0).round() as u32
    } else {
        0
    };

    Ok(MonthProgressResponse {
        month: params.month,
        total_checks,
        completed_checks,
        percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Habit;
    use crate::storage::SqliteStorage;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_month_progress() {
        let storage = SqliteStorage::in_memory().unwrap();

        let a = Habit::new("A".to_string(), 0).unwrap();
        let b = Habit::new("B".to_string(), 1).unwrap();
        storage.create_habit(&a).unwrap();
        storage.create_habit(&b).unwrap();

        storage.upsert_completion(&a.id, d("2026-02-01"), true).unwrap();
        storage.upsert_completion(&a.id, d("2026-02-02"), true).unwrap();
        storage.upsert_completion(&b.id, d("2026-02-01"), true).unwrap();
        storage.upsert_completion(&b.id, d("2026-01-31"), true).unwrap();

        let progress = progress_month(
            &storage,
            MonthParams { month: "2026-02".to_string() },
        )
        .unwrap();

        // 2 habits x 28 days = 56 cells, 3 completed, 5.36% rounds to 5
        assert_eq!(progress.total_checks, 56);
        assert_eq!(progress.completed_checks, 3);
        assert_eq!(progress.percentage, 5);
    }

    #[test]
    fn test_month_progress_empty() {
        let storage = SqliteStorage::in_memory().unwrap();

        let progress = progress_month(
            &storage,
            MonthParams { month: "2026-02".to_string() },
        )
        .unwrap();

        assert_eq!(progress.total_checks, 0);
        assert_eq!(progress.percentage, 0);
    }

    #[test]
    fn test_month_completions_filters_to_month() {
        let storage = SqliteStorage::in_memory().unwrap();

        let habit = Habit::new("A".to_string(), 0).unwrap();
        storage.create_habit(&habit).unwrap();
        storage.upsert_completion(&habit.id, d("2026-02-14"), true).unwrap();
        storage.upsert_completion(&habit.id, d("2026-03-01"), true).unwrap();

        let res = completions_month(
            &storage,
            MonthParams { month: "2026-02".to_string() },
        )
        .unwrap();

        assert_eq!(res.completions.len(), 1);
        assert_eq!(res.completions[0].date, d("2026-02-14"));
    }

    #[test]
    fn test_month_params_validated() {
        let storage = SqliteStorage::in_memory().unwrap();

        let res = progress_month(&storage, MonthParams { month: "2026-2".to_string() });
        assert!(matches!(res, Err(ToolError::Domain(_))));
    }
}
