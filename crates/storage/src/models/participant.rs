use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Per-competition membership row carrying the denormalized standings
/// aggregates. The aggregate fields are only ever written by the standings
/// recompute; everything else writes the ledger and lets the recompute
/// catch up.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Participant {
    pub participant_id: Uuid,
    pub competition_id: Uuid,
    pub user_id: Uuid,
    pub total_points: i32,
    pub move_calories: i32,
    pub exercise_minutes: i32,
    pub stand_hours: i32,
    pub step_count: i64,
    pub move_progress: Decimal,
    pub exercise_progress: Decimal,
    pub stand_progress: Decimal,
    pub last_sync_at: Option<chrono::NaiveDateTime>,
    pub joined_at: chrono::NaiveDateTime,
}
