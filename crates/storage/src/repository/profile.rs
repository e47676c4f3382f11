use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::profile::UpdateGoalsRequest;
use crate::error::{Result, StorageError};
use crate::models::Profile;

const PROFILE_COLUMNS: &str = "user_id, display_name, subscription_tier, \
     move_goal, exercise_goal, stand_goal, created_at";

/// Repository for user profiles. The subscription tier read here is the
/// authoritative one for payment-gated decisions.
pub struct ProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the profile, creating a default row on first contact. The
    /// no-op `DO UPDATE` makes the insert return the existing row instead
    /// of nothing when the profile is already there.
    pub async fn ensure(&self, user_id: Uuid) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn update_goals(&self, user_id: Uuid, goals: &UpdateGoalsRequest) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles
             SET move_goal = $2, exercise_goal = $3, stand_goal = $4
             WHERE user_id = $1
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(goals.move_goal)
        .bind(goals.exercise_goal)
        .bind(goals.stand_goal)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }
}
