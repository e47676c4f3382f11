use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{Competition, CompetitionStatus, CompetitionType, ScoringType};

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    pub scoring_type: ScoringType,

    /// Parameters for the `workout` scoring type; ignored by every other
    /// rule.
    pub scoring_config: Option<serde_json::Value>,

    #[serde(default)]
    pub is_public: bool,
}

/// Request payload for updating an existing competition. Which fields are
/// honored depends on the competition's status at edit time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    pub scoring_type: Option<ScoringType>,

    pub scoring_config: Option<serde_json::Value>,

    pub is_public: Option<bool>,
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub competition_type: CompetitionType,
    /// Status as of today, derived from the date span.
    pub status: CompetitionStatus,
    pub scoring_type: ScoringType,
    pub scoring_config: Option<serde_json::Value>,
    pub is_public: bool,
    pub creator_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
    pub participant_count: i64,
}

impl CompetitionResponse {
    pub fn new(comp: Competition, participant_count: i64, today: NaiveDate) -> Self {
        let status = comp.effective_status(today);
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            description: comp.description,
            start_date: comp.start_date,
            end_date: comp.end_date,
            competition_type: comp.competition_type,
            status,
            scoring_type: comp.scoring_type,
            scoring_config: comp.scoring_config,
            is_public: comp.is_public,
            creator_id: comp.creator_id,
            created_at: comp.created_at,
            participant_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_create_request_rejects_empty_name() {
        let req = CreateCompetitionRequest {
            name: String::new(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 10).expect("valid date"),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 16).expect("valid date"),
            scoring_type: ScoringType::RingClose,
            scoring_config: None,
            is_public: false,
        };
        assert!(req.validate().is_err());
    }
}
