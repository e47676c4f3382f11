use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::sync::DaySample;
use crate::error::{Result, StorageError};
use crate::models::{Competition, NewLedgerEntry};
use crate::repository::ledger::LedgerRepository;
use crate::repository::participant::ParticipantRepository;
use crate::repository::profile::ProfileRepository;
use crate::services::scoring::{self, DayMetrics, RingGoals};
use crate::services::standings::{self, StandingsTotals};

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub days_recorded: usize,
    pub days_skipped: usize,
    pub totals: StandingsTotals,
}

/// Record a batch of daily samples for one participant, then refresh their
/// standings aggregate.
///
/// The participant row must already exist; metrics never create memberships.
/// Samples dated outside the competition span are dropped. Each in-window
/// day is scored and upserted; the first failed write aborts the whole sync
/// (and skips the recompute), so the aggregate only ever reflects the last
/// fully-recorded state. Exactly one recompute pass runs per call no matter
/// how many days were written.
pub async fn record_daily_metrics(
    pool: &PgPool,
    competition: &Competition,
    user_id: Uuid,
    samples: &[DaySample],
) -> Result<SyncOutcome> {
    let participant = ParticipantRepository::new(pool)
        .find(competition.competition_id, user_id)
        .await?
        .ok_or(StorageError::ParticipantNotFound)?;

    let profile = ProfileRepository::new(pool).ensure(user_id).await?;
    let goals = RingGoals::of_profile(&profile);

    let ledger = LedgerRepository::new(pool);
    let mut days_recorded = 0;
    let mut days_skipped = 0;

    for sample in samples {
        if !within_span(sample.date, competition.start_date, competition.end_date) {
            days_skipped += 1;
            continue;
        }

        let metrics = DayMetrics {
            move_calories: sample.move_calories,
            exercise_minutes: sample.exercise_minutes,
            stand_hours: sample.stand_hours,
            step_count: sample.step_count,
        };
        let points = scoring::compute_points(competition.scoring_type, &metrics, &goals);

        ledger
            .upsert_day(&NewLedgerEntry {
                competition_id: competition.competition_id,
                user_id,
                participant_id: participant.participant_id,
                day: sample.date,
                move_calories: round_metric(sample.move_calories),
                exercise_minutes: round_metric(sample.exercise_minutes),
                stand_hours: round_metric(sample.stand_hours),
                step_count: round_metric_i64(sample.step_count),
                distance_meters: round_metric(sample.distance_meters),
                workouts_completed: round_metric(sample.workouts_completed),
                points,
            })
            .await?;
        days_recorded += 1;
    }

    let totals = standings::recompute(pool, competition, &participant, &goals).await?;

    Ok(SyncOutcome {
        days_recorded,
        days_skipped,
        totals,
    })
}

/// Inclusive on both bounds: a sample on the end date still counts.
pub fn within_span(day: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    day >= start && day <= end
}

fn round_metric(value: f64) -> i32 {
    scoring::sanitize(value).round() as i32
}

fn round_metric_i64(value: f64) -> i64 {
    scoring::sanitize(value).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).expect("valid date")
    }

    #[test]
    fn test_within_span_inclusive_bounds() {
        let start = date(1);
        let end = date(7);

        assert!(within_span(date(1), start, end));
        // the window's end date belongs to the window
        assert!(within_span(date(7), start, end));
        assert!(!within_span(date(8), start, end));
        assert!(!within_span(NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date"), start, end));
    }

    #[test]
    fn test_round_metric_handles_bad_inputs() {
        assert_eq!(round_metric(512.4), 512);
        assert_eq!(round_metric(512.5), 513);
        assert_eq!(round_metric(-3.0), 0);
        assert_eq!(round_metric(f64::NAN), 0);
        assert_eq!(round_metric_i64(10432.6), 10433);
    }
}
