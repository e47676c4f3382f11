use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// How a day's metrics are converted into points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "scoring_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    RingClose,
    Percentage,
    RawNumbers,
    StepCount,
    Workout,
}

/// Derived from the competition's date span, never chosen by the creator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "competition_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompetitionType {
    Weekend,
    Weekly,
    Monthly,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "competition_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CompetitionStatus {
    Upcoming,
    Active,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Competition {
    pub competition_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub competition_type: CompetitionType,
    /// Status as derived at creation time. Read sites that care about
    /// completion must go through [`Competition::effective_status`].
    pub status: CompetitionStatus,
    pub scoring_type: ScoringType,
    /// Extra parameters for the `workout` scoring type (allowed workout
    /// kinds, target metric). Opaque to every other rule.
    pub scoring_config: Option<serde_json::Value>,
    pub is_public: bool,
    pub creator_id: Uuid,
    pub created_at: chrono::NaiveDateTime,
}

impl Competition {
    /// Status as a function of the date span and today's date. The stored
    /// column is written once at creation and never ticked by a background
    /// job, so completion is always derived here at read time.
    pub fn effective_status(&self, today: NaiveDate) -> CompetitionStatus {
        crate::services::lifecycle::status_on(self.start_date, self.end_date, today)
    }
}

/// Values for inserting a competition, with the derived fields (type,
/// status) already computed.
#[derive(Debug, Clone)]
pub struct NewCompetition {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub competition_type: CompetitionType,
    pub status: CompetitionStatus,
    pub scoring_type: ScoringType,
    pub scoring_config: Option<serde_json::Value>,
    pub is_public: bool,
    pub creator_id: Uuid,
}
