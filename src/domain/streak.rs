/// Streak engine and freeze lifecycle rules
///
/// The current streak is the count of consecutive calendar days, ending at
/// and including today, on which the habit was completed or excused by a
/// streak freeze. It is computed by walking backward from today one day at a
/// time until the first unrecoverable gap. The engine is a pure function of
/// its inputs: the completion ledger, today's date, and the optional freeze
/// date. It never reads a clock and never touches storage.

use std::collections::HashSet;
use chrono::NaiveDate;

use crate::domain::{add_days, Habit};

/// Compute the current streak for a habit.
///
/// Walks backward from `today`. At each cursor position, in this order:
/// a completed day extends the streak; otherwise an unconsumed freeze
/// matching the cursor excuses the day without extending the streak;
/// otherwise the day is a gap and the walk stops. The precedence matters:
/// a freeze on a day that was independently completed is never consumed,
/// and a freeze older than the first genuine gap is never reached.
///
/// Missing today with no freeze yields 0: the recompute always reflects the
/// literal state of today. Callers that do not want to punish the user
/// before the day ends recompute after rollover (the habit list read path),
/// not continuously.
pub fn compute_streak(
    completions: &HashSet<NaiveDate>,
    today: NaiveDate,
    freeze_date: Option<NaiveDate>,
) -> u32 {
    let mut streak = 0;
    let mut cursor = today;
    let mut freeze_consumed = false;

    loop {
        if completions.contains(&cursor) {
            streak += 1;
            cursor = add_days(cursor, -1);
            continue;
        }

        // The freeze excuses exactly one missing day anywhere in the chain.
        if !freeze_consumed && freeze_date == Some(cursor) {
            freeze_consumed = true;
            cursor = add_days(cursor, -1);
            continue;
        }

        // Genuine gap: the contiguous run ends here.
        break;
    }

    streak
}

/// Result of renormalizing a habit's freeze against the current day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreezeNormalization {
    /// The freeze date after normalization
    pub freeze_date: Option<NaiveDate>,
    /// Whether the stored value needs to be rewritten
    pub changed: bool,
}

/// Clear a freeze that no longer refers to today.
///
/// A freeze protects exactly one specific calendar day. Once the local day
/// has advanced past it, the frozen day has either been folded into the
/// streak by the engine's one-time consumption or excluded as a gap; either
/// way it must not keep protecting later unrelated gaps. This runs before
/// every recompute triggered by a passive read, because rollover is
/// wall-clock-driven, not event-driven.
pub fn normalize_freeze_on_read(
    freeze_date: Option<NaiveDate>,
    today: NaiveDate,
) -> FreezeNormalization {
    match freeze_date {
        Some(date) if date != today => FreezeNormalization {
            freeze_date: None,
            changed: true,
        },
        other => FreezeNormalization {
            freeze_date: other,
            changed: false,
        },
    }
}

/// Renormalize a habit's freeze and fully recompute its cached streak.
///
/// Returns true when either stored field changed, so read-triggered callers
/// only write back when necessary. The streak is always derived fresh from
/// the complete ledger, which is what makes backfilling an old missing date
/// retroactively extend it.
pub fn recompute_habit(
    habit: &mut Habit,
    completions: &HashSet<NaiveDate>,
    today: NaiveDate,
) -> bool {
    let normalized = normalize_freeze_on_read(habit.freeze_date, today);
    let streak = compute_streak(completions, today, normalized.freeze_date);

    let changed = normalized.changed || habit.streak != streak;
    habit.freeze_date = normalized.freeze_date;
    habit.streak = streak;

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Habit;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn days(dates: &[&str]) -> HashSet<NaiveDate> {
        dates.iter().map(|s| d(s)).collect()
    }

    #[test]
    fn test_empty_ledger_is_zero() {
        assert_eq!(compute_streak(&HashSet::new(), d("2026-02-04"), None), 0);
    }

    #[test]
    fn test_today_alone_counts_immediately() {
        // The walk starts at today, not yesterday: same-day credit.
        let completions = days(&["2026-02-04"]);
        assert_eq!(compute_streak(&completions, d("2026-02-04"), None), 1);
    }

    #[test]
    fn test_missing_today_without_freeze_breaks_at_today() {
        // Scenario A: the gap at today itself stops the walk immediately.
        let completions = days(&["2026-02-02", "2026-02-03"]);
        assert_eq!(compute_streak(&completions, d("2026-02-04"), None), 0);
    }

    #[test]
    fn test_contiguous_run_through_today() {
        // Scenario B
        let completions = days(&["2026-02-02", "2026-02-03", "2026-02-04"]);
        assert_eq!(compute_streak(&completions, d("2026-02-04"), None), 3);
    }

    #[test]
    fn test_freeze_excuses_today_without_counting_it() {
        // Scenario C: today is excused, two completed days count, then the
        // gap at 2026-02-01 stops the walk.
        let completions = days(&["2026-02-02", "2026-02-03"]);
        assert_eq!(
            compute_streak(&completions, d("2026-02-04"), Some(d("2026-02-04"))),
            2
        );
    }

    #[test]
    fn test_stale_freeze_cleared_then_recomputed() {
        // Scenario D: a day later the stale freeze is renormalized away
        // first; both 02-05 and 02-04 are then unresolved gaps.
        let normalized = normalize_freeze_on_read(Some(d("2026-02-04")), d("2026-02-05"));
        assert_eq!(
            normalized,
            FreezeNormalization { freeze_date: None, changed: true }
        );

        let completions = days(&["2026-02-02", "2026-02-03"]);
        assert_eq!(
            compute_streak(&completions, d("2026-02-05"), normalized.freeze_date),
            0
        );
    }

    #[test]
    fn test_backfill_extends_streak() {
        // Scenario E: 2026-02-04 was backfilled later. With today itself
        // excused by a freeze the three backfilled days still count; with
        // today also completed the run reaches 4. Either way it stops at
        // the 2026-02-01 gap.
        let backfilled = days(&["2026-02-02", "2026-02-03", "2026-02-04"]);
        assert_eq!(
            compute_streak(&backfilled, d("2026-02-05"), Some(d("2026-02-05"))),
            3
        );

        let mut with_today = backfilled.clone();
        with_today.insert(d("2026-02-05"));
        assert_eq!(compute_streak(&with_today, d("2026-02-05"), None), 4);
    }

    #[test]
    fn test_freeze_anywhere_in_chain() {
        // The freeze is not restricted to today; it bridges an interior gap.
        let completions = days(&["2026-02-01", "2026-02-02", "2026-02-04", "2026-02-05"]);
        assert_eq!(
            compute_streak(&completions, d("2026-02-05"), Some(d("2026-02-03"))),
            4
        );
    }

    #[test]
    fn test_freeze_consumed_at_most_once() {
        // Two gaps, one freeze: only the first gap encountered is excused.
        let completions = days(&["2026-02-01", "2026-02-02", "2026-02-05"]);
        assert_eq!(
            compute_streak(&completions, d("2026-02-05"), Some(d("2026-02-04"))),
            1
        );
    }

    #[test]
    fn test_completed_day_shadows_freeze() {
        // A freeze on an independently completed day is never evaluated:
        // the completed-day check matches first, so there is no double
        // credit and the result equals the no-freeze result.
        let completions = days(&["2026-02-02", "2026-02-04", "2026-02-05"]);
        let today = d("2026-02-05");
        assert_eq!(
            compute_streak(&completions, today, Some(d("2026-02-04"))),
            compute_streak(&completions, today, None)
        );
        assert_eq!(compute_streak(&completions, today, Some(d("2026-02-04"))), 2);
    }

    #[test]
    fn test_freeze_beyond_first_gap_has_no_effect() {
        // The gap at 02-04 stops the walk before the freeze day is reached.
        let completions = days(&["2026-02-01", "2026-02-05"]);
        assert_eq!(
            compute_streak(&completions, d("2026-02-05"), Some(d("2026-02-02"))),
            1
        );
    }

    #[test]
    fn test_idempotent() {
        let completions = days(&["2026-02-02", "2026-02-03", "2026-02-04"]);
        let first = compute_streak(&completions, d("2026-02-04"), Some(d("2026-02-01")));
        let second = compute_streak(&completions, d("2026-02-04"), Some(d("2026-02-01")));
        assert_eq!(first, second);
    }

    #[test]
    fn test_backfill_is_monotonic() {
        let today = d("2026-02-05");
        let base = days(&["2026-02-05"]);
        let mut extended = base.clone();
        extended.insert(d("2026-02-04"));
        extended.insert(d("2026-02-03"));

        let before = compute_streak(&base, today, None);
        let after = compute_streak(&extended, today, None);
        assert!(after >= before);
        assert_eq!(after, 3);
    }

    #[test]
    fn test_normalize_keeps_todays_freeze() {
        let today = d("2026-02-04");
        assert_eq!(
            normalize_freeze_on_read(Some(today), today),
            FreezeNormalization { freeze_date: Some(today), changed: false }
        );
        assert_eq!(
            normalize_freeze_on_read(None, today),
            FreezeNormalization { freeze_date: None, changed: false }
        );
    }

    #[test]
    fn test_recompute_habit_reports_change() {
        let mut habit = Habit::new("Read".to_string(), 0).unwrap();
        habit.streak = 2;
        habit.freeze_date = Some(d("2026-02-04"));

        // Rollover to 02-05: freeze cleared, streak collapses to 0.
        let completions = days(&["2026-02-02", "2026-02-03"]);
        let changed = recompute_habit(&mut habit, &completions, d("2026-02-05"));
        assert!(changed);
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.freeze_date, None);

        // Recomputing again with identical inputs changes nothing.
        let changed = recompute_habit(&mut habit, &completions, d("2026-02-05"));
        assert!(!changed);
    }
}
