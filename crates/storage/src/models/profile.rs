use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Billing tier as recorded server-side. Payment-gated decisions read this
/// row, never a tier asserted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_tier", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

/// User profile: display identity, billing tier and the three daily ring
/// goals used for scoring and progress averages.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub user_id: Uuid,
    pub display_name: String,
    pub subscription_tier: SubscriptionTier,
    pub move_goal: i32,
    pub exercise_goal: i32,
    pub stand_goal: i32,
    pub created_at: chrono::NaiveDateTime,
}
