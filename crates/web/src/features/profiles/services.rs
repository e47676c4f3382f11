use sqlx::PgPool;
use storage::{
    dto::profile::{ProfileResponse, UpdateGoalsRequest},
    repository::profile::ProfileRepository,
};
use uuid::Uuid;

use crate::error::WebResult;

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> WebResult<ProfileResponse> {
    let profile = ProfileRepository::new(pool).ensure(user_id).await?;
    Ok(ProfileResponse::from(profile))
}

/// Update the caller's ring goals. New goals only affect aggregates the
/// next time their standings are recomputed.
pub async fn update_goals(
    pool: &PgPool,
    user_id: Uuid,
    req: &UpdateGoalsRequest,
) -> WebResult<ProfileResponse> {
    let repo = ProfileRepository::new(pool);
    repo.ensure(user_id).await?;
    let profile = repo.update_goals(user_id, req).await?;
    Ok(ProfileResponse::from(profile))
}
