use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Participant;

/// One leaderboard row, ranked by cumulative points.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingsEntry {
    pub rank: i64,
    pub user_id: Uuid,
    pub display_name: String,
    pub total_points: i32,
    pub move_calories: i32,
    pub exercise_minutes: i32,
    pub stand_hours: i32,
    pub step_count: i64,
    pub move_progress: Decimal,
    pub exercise_progress: Decimal,
    pub stand_progress: Decimal,
    pub last_sync_at: Option<chrono::NaiveDateTime>,
}

impl StandingsEntry {
    pub fn new(rank: i64, display_name: String, participant: Participant) -> Self {
        Self {
            rank,
            user_id: participant.user_id,
            display_name,
            total_points: participant.total_points,
            move_calories: participant.move_calories,
            exercise_minutes: participant.exercise_minutes,
            stand_hours: participant.stand_hours,
            step_count: participant.step_count,
            move_progress: participant.move_progress,
            exercise_progress: participant.exercise_progress,
            stand_progress: participant.stand_progress,
            last_sync_at: participant.last_sync_at,
        }
    }
}
