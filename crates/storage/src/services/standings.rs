use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Competition, LedgerEntry, Participant};
use crate::repository::ledger::LedgerRepository;
use crate::repository::participant::ParticipantRepository;
use crate::services::scoring::RingGoals;

/// The denormalized aggregate written back to a participant row: cumulative
/// sums over the ledger window plus per-ring progress averages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandingsTotals {
    pub total_points: i32,
    pub move_calories: i32,
    pub exercise_minutes: i32,
    pub stand_hours: i32,
    pub step_count: i64,
    pub move_progress: Decimal,
    pub exercise_progress: Decimal,
    pub stand_progress: Decimal,
    pub day_count: usize,
}

/// Fold a user's ledger rows into standings totals.
///
/// Progress averages divide by the number of rows actually present, not the
/// calendar span: a user who synced 3 of 7 days averages over 3. Summing the
/// full window from scratch instead of applying deltas keeps the aggregate
/// immune to repeated and out-of-order syncs.
pub fn fold_standings(rows: &[LedgerEntry], goals: &RingGoals) -> StandingsTotals {
    if rows.is_empty() {
        return StandingsTotals::default();
    }

    let mut totals = StandingsTotals {
        day_count: rows.len(),
        ..StandingsTotals::default()
    };

    for row in rows {
        totals.total_points += row.points;
        totals.move_calories += row.move_calories;
        totals.exercise_minutes += row.exercise_minutes;
        totals.stand_hours += row.stand_hours;
        totals.step_count += row.step_count;
    }

    let days = rows.len() as f64;
    totals.move_progress = progress(f64::from(totals.move_calories), goals.move_calories, days);
    totals.exercise_progress = progress(
        f64::from(totals.exercise_minutes),
        goals.exercise_minutes,
        days,
    );
    totals.stand_progress = progress(f64::from(totals.stand_hours), goals.stand_hours, days);

    totals
}

fn progress(metric_sum: f64, goal: f64, days: f64) -> Decimal {
    if goal <= 0.0 || !goal.is_finite() || days <= 0.0 {
        return Decimal::ZERO;
    }
    Decimal::from_f64_retain(metric_sum / (goal * days))
        .unwrap_or(Decimal::ZERO)
        .round_dp(4)
}

/// Recompute a participant's aggregates from their full ledger window and
/// write them back in one atomic update.
pub async fn recompute(
    pool: &PgPool,
    competition: &Competition,
    participant: &Participant,
    goals: &RingGoals,
) -> Result<StandingsTotals> {
    let rows = LedgerRepository::new(pool)
        .fetch_range(
            competition.competition_id,
            participant.user_id,
            competition.start_date,
            competition.end_date,
        )
        .await?;

    let totals = fold_standings(&rows, goals);

    ParticipantRepository::new(pool)
        .update_aggregates(participant.participant_id, &totals)
        .await?;

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn goals() -> RingGoals {
        RingGoals {
            move_calories: 500.0,
            exercise_minutes: 30.0,
            stand_hours: 12.0,
        }
    }

    fn entry(day: u32, move_calories: i32, exercise: i32, stand: i32, points: i32) -> LedgerEntry {
        let day = NaiveDate::from_ymd_opt(2025, 1, day).expect("valid date");
        LedgerEntry {
            entry_id: Uuid::new_v4(),
            competition_id: Uuid::nil(),
            user_id: Uuid::nil(),
            participant_id: Uuid::nil(),
            day,
            move_calories,
            exercise_minutes: exercise,
            stand_hours: stand,
            step_count: 0,
            distance_meters: 0,
            workouts_completed: 0,
            points,
            synced_at: day.and_hms_opt(12, 0, 0).expect("valid time"),
        }
    }

    #[test]
    fn test_fold_empty_ledger_is_all_zero() {
        let totals = fold_standings(&[], &goals());
        assert_eq!(totals, StandingsTotals::default());
    }

    #[test]
    fn test_fold_two_day_example() {
        // day 1 closes every ring, day 2 reaches half of each goal
        let rows = vec![entry(1, 500, 30, 12, 300), entry(2, 250, 15, 6, 0)];
        let totals = fold_standings(&rows, &goals());

        assert_eq!(totals.total_points, 300);
        assert_eq!(totals.move_calories, 750);
        assert_eq!(totals.exercise_minutes, 45);
        assert_eq!(totals.stand_hours, 18);
        assert_eq!(totals.day_count, 2);
        // (1.0 + 0.5) / 2
        assert_eq!(totals.move_progress, Decimal::new(75, 2));
        assert_eq!(totals.exercise_progress, Decimal::new(75, 2));
        assert_eq!(totals.stand_progress, Decimal::new(75, 2));
    }

    #[test]
    fn test_fold_averages_over_synced_days_only() {
        // 3 of 7 days synced: divide by 3, not the calendar span
        let rows = vec![
            entry(1, 500, 30, 12, 300),
            entry(3, 500, 30, 12, 300),
            entry(5, 500, 30, 12, 300),
        ];
        let totals = fold_standings(&rows, &goals());
        assert_eq!(totals.move_progress, Decimal::ONE);
        assert_eq!(totals.total_points, 900);
    }

    #[test]
    fn test_fold_zero_goal_progress_is_zero() {
        let rows = vec![entry(1, 500, 30, 12, 300)];
        let zero_goals = RingGoals {
            move_calories: 0.0,
            exercise_minutes: 30.0,
            stand_hours: 12.0,
        };
        let totals = fold_standings(&rows, &zero_goals);
        assert_eq!(totals.move_progress, Decimal::ZERO);
        assert_eq!(totals.exercise_progress, Decimal::ONE);
    }

    #[test]
    fn test_upsert_then_fold_replaces_not_accumulates() {
        // model the ledger's natural-key upsert: same day written twice keeps
        // one row carrying the second write's numbers
        let mut ledger: BTreeMap<NaiveDate, LedgerEntry> = BTreeMap::new();

        let first = entry(7, 400, 20, 10, 0);
        let second = entry(7, 500, 30, 12, 300);
        ledger.insert(first.day, first);
        ledger.insert(second.day, second);

        let rows: Vec<LedgerEntry> = ledger.into_values().collect();
        assert_eq!(rows.len(), 1);

        let totals = fold_standings(&rows, &goals());
        assert_eq!(totals.total_points, 300);
        assert_eq!(totals.move_calories, 500);
    }

    #[test]
    fn test_fold_is_idempotent_over_identical_replay() {
        let rows = vec![entry(1, 500, 30, 12, 300), entry(2, 250, 15, 6, 0)];
        let once = fold_standings(&rows, &goals());
        let twice = fold_standings(&rows, &goals());
        assert_eq!(once, twice);
    }
}
