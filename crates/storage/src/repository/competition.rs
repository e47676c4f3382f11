use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Competition, NewCompetition};
use crate::services::lifecycle::CompetitionChanges;

const COMPETITION_COLUMNS: &str = "competition_id, name, description, start_date, end_date, \
     competition_type, status, scoring_type, scoring_config, is_public, creator_id, created_at";

#[derive(sqlx::FromRow)]
struct CompetitionWithCountRow {
    #[sqlx(flatten)]
    competition: Competition,
    participant_count: i64,
}

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List public competitions together with their member counts in one
    /// query.
    pub async fn list_public_with_counts(&self, limit: i64) -> Result<Vec<(Competition, i64)>> {
        let rows = sqlx::query_as::<_, CompetitionWithCountRow>(
            "SELECT c.competition_id, c.name, c.description, c.start_date, c.end_date,
                    c.competition_type, c.status, c.scoring_type, c.scoring_config,
                    c.is_public, c.creator_id, c.created_at,
                    COUNT(p.participant_id) AS participant_count
             FROM competitions c
             LEFT JOIN competition_participants p ON p.competition_id = c.competition_id
             WHERE c.is_public
             GROUP BY c.competition_id
             ORDER BY c.start_date DESC, c.created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.competition, row.participant_count))
            .collect())
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "SELECT {COMPETITION_COLUMNS}
             FROM competitions
             WHERE competition_id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Create a new competition
    pub async fn create(&self, new: &NewCompetition) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "INSERT INTO competitions (
                 competition_id, name, description, start_date, end_date,
                 competition_type, status, scoring_type, scoring_config,
                 is_public, creator_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COMPETITION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.competition_type)
        .bind(new.status)
        .bind(new.scoring_type)
        .bind(&new.scoring_config)
        .bind(new.is_public)
        .bind(new.creator_id)
        .fetch_one(self.pool)
        .await?;

        Ok(competition)
    }

    /// Write back the merged field set produced by an update.
    pub async fn update(&self, id: Uuid, changes: &CompetitionChanges) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(&format!(
            "UPDATE competitions
             SET
                 name = $2,
                 description = $3,
                 start_date = $4,
                 end_date = $5,
                 competition_type = $6,
                 status = $7,
                 scoring_type = $8,
                 scoring_config = $9,
                 is_public = $10
             WHERE competition_id = $1
             RETURNING {COMPETITION_COLUMNS}"
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .bind(changes.competition_type)
        .bind(changes.status)
        .bind(changes.scoring_type)
        .bind(&changes.scoring_config)
        .bind(changes.is_public)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Delete a competition by ID. Participants, ledger rows and invitations
    /// go with it via cascade.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM competitions WHERE competition_id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
