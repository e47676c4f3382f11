use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Profile, SubscriptionTier};

/// Request payload for updating the three daily ring goals.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateGoalsRequest {
    #[validate(range(min = 1, max = 5000, message = "move_goal must be between 1 and 5000"))]
    pub move_goal: i32,

    #[validate(range(min = 1, max = 1440, message = "exercise_goal must be between 1 and 1440"))]
    pub exercise_goal: i32,

    #[validate(range(min = 1, max = 24, message = "stand_goal must be between 1 and 24"))]
    pub stand_goal: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user_id: Uuid,
    pub display_name: String,
    pub subscription_tier: SubscriptionTier,
    pub move_goal: i32,
    pub exercise_goal: i32,
    pub stand_goal: i32,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            user_id: profile.user_id,
            display_name: profile.display_name,
            subscription_tier: profile.subscription_tier,
            move_goal: profile.move_goal,
            exercise_goal: profile.exercise_goal,
            stand_goal: profile.stand_goal,
        }
    }
}
