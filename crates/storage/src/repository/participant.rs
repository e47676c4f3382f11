use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Participant;
use crate::services::standings::StandingsTotals;

const PARTICIPANT_COLUMNS: &str = "participant_id, competition_id, user_id, total_points, \
     move_calories, exercise_minutes, stand_hours, step_count, \
     move_progress, exercise_progress, stand_progress, last_sync_at, joined_at";

#[derive(sqlx::FromRow)]
struct RankedParticipantRow {
    #[sqlx(flatten)]
    participant: Participant,
    display_name: Option<String>,
}

/// Repository for competition membership rows and their standings
/// aggregates.
pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, competition_id: Uuid, user_id: Uuid) -> Result<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS}
             FROM competition_participants
             WHERE competition_id = $1 AND user_id = $2"
        ))
        .bind(competition_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(participant)
    }

    /// Insert a membership row with zeroed aggregates.
    pub async fn insert(&self, competition_id: Uuid, user_id: Uuid) -> Result<Participant> {
        let participant = sqlx::query_as::<_, Participant>(&format!(
            "INSERT INTO competition_participants (participant_id, competition_id, user_id)
             VALUES ($1, $2, $3)
             RETURNING {PARTICIPANT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(competition_id)
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::ConstraintViolation("Already a participant".to_string())
            } else {
                err
            }
        })?;

        Ok(participant)
    }

    /// Leaderboard order: points first, earliest joiner breaking ties.
    pub async fn list_by_points(&self, competition_id: Uuid) -> Result<Vec<Participant>> {
        let participants = sqlx::query_as::<_, Participant>(&format!(
            "SELECT {PARTICIPANT_COLUMNS}
             FROM competition_participants
             WHERE competition_id = $1
             ORDER BY total_points DESC, joined_at ASC"
        ))
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// Leaderboard rows joined with display names. Users without a profile
    /// row yet show up under the default name.
    pub async fn list_by_points_with_names(
        &self,
        competition_id: Uuid,
    ) -> Result<Vec<(Participant, String)>> {
        let rows = sqlx::query_as::<_, RankedParticipantRow>(
            "SELECT p.participant_id, p.competition_id, p.user_id, p.total_points,
                    p.move_calories, p.exercise_minutes, p.stand_hours, p.step_count,
                    p.move_progress, p.exercise_progress, p.stand_progress,
                    p.last_sync_at, p.joined_at,
                    pr.display_name
             FROM competition_participants p
             LEFT JOIN profiles pr ON pr.user_id = p.user_id
             WHERE p.competition_id = $1
             ORDER BY p.total_points DESC, p.joined_at ASC",
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let name = row
                    .display_name
                    .unwrap_or_else(|| "Athlete".to_string());
                (row.participant, name)
            })
            .collect())
    }

    pub async fn count(&self, competition_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM competition_participants WHERE competition_id = $1",
        )
        .bind(competition_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Single atomic write of the recomputed aggregates plus the sync
    /// timestamp.
    pub async fn update_aggregates(
        &self,
        participant_id: Uuid,
        totals: &StandingsTotals,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE competition_participants
             SET
                 total_points = $2,
                 move_calories = $3,
                 exercise_minutes = $4,
                 stand_hours = $5,
                 step_count = $6,
                 move_progress = $7,
                 exercise_progress = $8,
                 stand_progress = $9,
                 last_sync_at = now()
             WHERE participant_id = $1",
        )
        .bind(participant_id)
        .bind(totals.total_points)
        .bind(totals.move_calories)
        .bind(totals.exercise_minutes)
        .bind(totals.stand_hours)
        .bind(totals.step_count)
        .bind(totals.move_progress)
        .bind(totals.exercise_progress)
        .bind(totals.stand_progress)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ParticipantNotFound);
        }

        Ok(())
    }

    /// Remove a membership row. The caller has already decided the removal
    /// is allowed; a zero-row delete here means the participant vanished
    /// underneath us.
    pub async fn delete(&self, competition_id: Uuid, user_id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "DELETE FROM competition_participants
             WHERE competition_id = $1 AND user_id = $2",
        )
        .bind(competition_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ParticipantNotFound);
        }

        Ok(())
    }
}
