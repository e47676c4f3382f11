use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One synced calendar day for one participant. The natural key is
/// (competition_id, user_id, day); re-syncing the same day replaces the row
/// wholesale rather than adding a second one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LedgerEntry {
    pub entry_id: Uuid,
    pub competition_id: Uuid,
    pub user_id: Uuid,
    /// Denormalized pointer, resolved when the row is written.
    pub participant_id: Uuid,
    pub day: NaiveDate,
    pub move_calories: i32,
    pub exercise_minutes: i32,
    pub stand_hours: i32,
    pub step_count: i64,
    pub distance_meters: i32,
    pub workouts_completed: i32,
    pub points: i32,
    pub synced_at: chrono::NaiveDateTime,
}

/// Values for a single ledger upsert, already normalized: the day carries no
/// time component and every metric has been rounded to an integer.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    pub competition_id: Uuid,
    pub user_id: Uuid,
    pub participant_id: Uuid,
    pub day: NaiveDate,
    pub move_calories: i32,
    pub exercise_minutes: i32,
    pub stand_hours: i32,
    pub step_count: i64,
    pub distance_meters: i32,
    pub workouts_completed: i32,
    pub points: i32,
}
