use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{LedgerEntry, NewLedgerEntry};

const LEDGER_COLUMNS: &str = "entry_id, competition_id, user_id, participant_id, day, \
     move_calories, exercise_minutes, stand_hours, step_count, distance_meters, \
     workouts_completed, points, synced_at";

/// Repository for the per-day metrics ledger.
pub struct LedgerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> LedgerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write one day's row, replacing any existing row for the same
    /// (competition, user, day). Re-syncing a day with revised numbers
    /// overwrites it wholesale; nothing ever accumulates at this level.
    pub async fn upsert_day(&self, entry: &NewLedgerEntry) -> Result<()> {
        sqlx::query(
            "INSERT INTO ledger_entries (
                 entry_id, competition_id, user_id, participant_id, day,
                 move_calories, exercise_minutes, stand_hours, step_count,
                 distance_meters, workouts_completed, points, synced_at
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, now())
             ON CONFLICT (competition_id, user_id, day) DO UPDATE SET
                 participant_id = EXCLUDED.participant_id,
                 move_calories = EXCLUDED.move_calories,
                 exercise_minutes = EXCLUDED.exercise_minutes,
                 stand_hours = EXCLUDED.stand_hours,
                 step_count = EXCLUDED.step_count,
                 distance_meters = EXCLUDED.distance_meters,
                 workouts_completed = EXCLUDED.workouts_completed,
                 points = EXCLUDED.points,
                 synced_at = now()",
        )
        .bind(Uuid::new_v4())
        .bind(entry.competition_id)
        .bind(entry.user_id)
        .bind(entry.participant_id)
        .bind(entry.day)
        .bind(entry.move_calories)
        .bind(entry.exercise_minutes)
        .bind(entry.stand_hours)
        .bind(entry.step_count)
        .bind(entry.distance_meters)
        .bind(entry.workouts_completed)
        .bind(entry.points)
        .execute(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            // the participant_id pointer no longer resolves: the membership
            // row was deleted while this sync was in flight
            if err.is_foreign_key_violation() {
                StorageError::ParticipantNotFound
            } else {
                err
            }
        })?;

        Ok(())
    }

    /// Fetch a user's ledger rows inside a date window. Both bounds are
    /// inclusive: a row on the window's end date belongs to the window.
    pub async fn fetch_range(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<LedgerEntry>> {
        let entries = sqlx::query_as::<_, LedgerEntry>(&format!(
            "SELECT {LEDGER_COLUMNS}
             FROM ledger_entries
             WHERE competition_id = $1
               AND user_id = $2
               AND day >= $3
               AND day <= $4
             ORDER BY day ASC"
        ))
        .bind(competition_id)
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
