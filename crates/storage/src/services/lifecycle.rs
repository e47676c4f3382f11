use chrono::{Datelike, NaiveDate, Weekday};

use crate::dto::competition::UpdateCompetitionRequest;
use crate::error::{Result, StorageError};
use crate::models::{Competition, CompetitionStatus, CompetitionType};

/// Weekday a two-day competition must start on to classify as a weekend.
pub const WEEKEND_START: Weekday = Weekday::Sat;

/// Inclusive day count of a competition's span.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Classify a competition purely from its date span. Recomputed identically
/// at creation and on every edit; never stored as user input.
pub fn classify_type(start: NaiveDate, end: NaiveDate) -> CompetitionType {
    let duration = duration_days(start, end);

    if duration == 2 && start.weekday() == WEEKEND_START {
        CompetitionType::Weekend
    } else if duration == 7 {
        CompetitionType::Weekly
    } else if (28..=31).contains(&duration) {
        CompetitionType::Monthly
    } else {
        CompetitionType::Custom
    }
}

/// Status of a date span as seen on a given day. Both the value stored at
/// creation and every read-time check go through this one function, so there
/// is a single notion of "active" in the system.
pub fn status_on(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> CompetitionStatus {
    if end < today {
        CompetitionStatus::Completed
    } else if start <= today {
        CompetitionStatus::Active
    } else {
        CompetitionStatus::Upcoming
    }
}

/// `end_date` must be strictly after `start_date` (dates are already
/// normalized to day precision).
pub fn validate_date_span(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if end <= start {
        return Err(StorageError::InvalidInput(
            "end_date must be after start_date".to_string(),
        ));
    }
    Ok(())
}

/// Which fields an edit may touch in each status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditPermissions {
    pub name: bool,
    pub description: bool,
    pub visibility: bool,
    pub start_date: bool,
    pub end_date: bool,
    pub scoring: bool,
}

pub fn edit_permissions(status: CompetitionStatus) -> EditPermissions {
    match status {
        CompetitionStatus::Upcoming => EditPermissions {
            name: true,
            description: true,
            visibility: true,
            start_date: true,
            end_date: true,
            scoring: true,
        },
        // Once people are scoring points, the window start and the rule are
        // locked; only the end can still be moved.
        CompetitionStatus::Active => EditPermissions {
            name: true,
            description: true,
            visibility: true,
            start_date: false,
            end_date: true,
            scoring: false,
        },
        CompetitionStatus::Completed => EditPermissions {
            name: false,
            description: false,
            visibility: false,
            start_date: false,
            end_date: false,
            scoring: false,
        },
    }
}

/// The full field set written back by an update, after gating and
/// re-derivation.
#[derive(Debug, Clone)]
pub struct CompetitionChanges {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub competition_type: CompetitionType,
    pub status: CompetitionStatus,
    pub scoring_type: crate::models::ScoringType,
    pub scoring_config: Option<serde_json::Value>,
    pub is_public: bool,
}

/// Merge an update request into an existing competition, enforcing the
/// editability matrix against the competition's effective status. This is
/// the authoritative check; a client hiding its edit controls is not enough.
pub fn apply_update(
    competition: &Competition,
    req: &UpdateCompetitionRequest,
    today: NaiveDate,
) -> Result<CompetitionChanges> {
    let status = competition.effective_status(today);
    let allowed = edit_permissions(status);

    if status == CompetitionStatus::Completed {
        return Err(StorageError::InvalidInput(
            "completed competitions cannot be edited".to_string(),
        ));
    }
    if req.start_date.is_some() && !allowed.start_date {
        return Err(StorageError::InvalidInput(
            "start_date is locked once the competition is active".to_string(),
        ));
    }
    if (req.scoring_type.is_some() || req.scoring_config.is_some()) && !allowed.scoring {
        return Err(StorageError::InvalidInput(
            "scoring is locked once the competition is active".to_string(),
        ));
    }

    let start_date = req.start_date.unwrap_or(competition.start_date);
    let end_date = req.end_date.unwrap_or(competition.end_date);
    validate_date_span(start_date, end_date)?;

    Ok(CompetitionChanges {
        name: req.name.clone().unwrap_or_else(|| competition.name.clone()),
        description: req
            .description
            .clone()
            .or_else(|| competition.description.clone()),
        start_date,
        end_date,
        competition_type: classify_type(start_date, end_date),
        status: status_on(start_date, end_date, today),
        scoring_type: req.scoring_type.unwrap_or(competition.scoring_type),
        scoring_config: req
            .scoring_config
            .clone()
            .or_else(|| competition.scoring_config.clone()),
        is_public: req.is_public.unwrap_or(competition.is_public),
    })
}

/// Why a public join was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRefusal {
    NotPublic,
    AlreadyCompleted,
    AlreadyStarted,
}

/// Server-side gate for the public join path. Reachable by any authenticated
/// identity, so these rules cannot live only in the client.
pub fn check_public_join(
    competition: &Competition,
    today: NaiveDate,
) -> std::result::Result<(), JoinRefusal> {
    if !competition.is_public {
        return Err(JoinRefusal::NotPublic);
    }
    match competition.effective_status(today) {
        CompetitionStatus::Completed => Err(JoinRefusal::AlreadyCompleted),
        // Custom competitions stay joinable mid-flight; the fixed-span kinds
        // close at their start date.
        CompetitionStatus::Active if competition.competition_type != CompetitionType::Custom => {
            Err(JoinRefusal::AlreadyStarted)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoringType;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn competition(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Competition {
        Competition {
            competition_id: Uuid::new_v4(),
            name: "Test".to_string(),
            description: None,
            start_date: start,
            end_date: end,
            competition_type: classify_type(start, end),
            status: status_on(start, end, today),
            scoring_type: ScoringType::RingClose,
            scoring_config: None,
            is_public: true,
            creator_id: Uuid::new_v4(),
            created_at: date(2025, 1, 1).and_hms_opt(0, 0, 0).expect("valid time"),
        }
    }

    #[test]
    fn test_classify_weekend() {
        // 2025-01-04 is a Saturday
        assert_eq!(
            classify_type(date(2025, 1, 4), date(2025, 1, 5)),
            CompetitionType::Weekend
        );
    }

    #[test]
    fn test_two_days_off_saturday_is_custom() {
        // Sunday start, same two-day span
        assert_eq!(
            classify_type(date(2025, 1, 5), date(2025, 1, 6)),
            CompetitionType::Custom
        );
    }

    #[test]
    fn test_classify_weekly() {
        assert_eq!(
            classify_type(date(2025, 1, 6), date(2025, 1, 12)),
            CompetitionType::Weekly
        );
    }

    #[test]
    fn test_classify_monthly_bounds() {
        // 28 and 31 inclusive days both count as monthly
        assert_eq!(
            classify_type(date(2025, 2, 1), date(2025, 2, 28)),
            CompetitionType::Monthly
        );
        assert_eq!(
            classify_type(date(2025, 1, 1), date(2025, 1, 31)),
            CompetitionType::Monthly
        );
        // 27 and 32 days fall through to custom
        assert_eq!(
            classify_type(date(2025, 1, 1), date(2025, 1, 27)),
            CompetitionType::Custom
        );
        assert_eq!(
            classify_type(date(2025, 1, 1), date(2025, 2, 1)),
            CompetitionType::Custom
        );
    }

    #[test]
    fn test_status_on_boundaries() {
        let start = date(2025, 1, 10);
        let end = date(2025, 1, 16);

        assert_eq!(status_on(start, end, date(2025, 1, 9)), CompetitionStatus::Upcoming);
        assert_eq!(status_on(start, end, start), CompetitionStatus::Active);
        // the last day still counts as active; completion begins the day after
        assert_eq!(status_on(start, end, end), CompetitionStatus::Active);
        assert_eq!(status_on(start, end, date(2025, 1, 17)), CompetitionStatus::Completed);
    }

    #[test]
    fn test_edit_permissions_matrix() {
        let upcoming = edit_permissions(CompetitionStatus::Upcoming);
        assert!(upcoming.start_date && upcoming.scoring && upcoming.end_date);

        let active = edit_permissions(CompetitionStatus::Active);
        assert!(active.name && active.description && active.visibility && active.end_date);
        assert!(!active.start_date && !active.scoring);

        let completed = edit_permissions(CompetitionStatus::Completed);
        assert_eq!(
            completed,
            EditPermissions {
                name: false,
                description: false,
                visibility: false,
                start_date: false,
                end_date: false,
                scoring: false,
            }
        );
    }

    #[test]
    fn test_date_span_must_be_strictly_increasing() {
        assert!(validate_date_span(date(2025, 1, 10), date(2025, 1, 11)).is_ok());
        assert!(validate_date_span(date(2025, 1, 10), date(2025, 1, 10)).is_err());
        assert!(validate_date_span(date(2025, 1, 10), date(2025, 1, 9)).is_err());
    }

    #[test]
    fn test_update_locks_start_date_when_active() {
        let today = date(2025, 1, 12);
        let comp = competition(date(2025, 1, 10), date(2025, 1, 16), today);

        let req = UpdateCompetitionRequest {
            start_date: Some(date(2025, 1, 11)),
            ..UpdateCompetitionRequest::default()
        };
        assert!(apply_update(&comp, &req, today).is_err());
    }

    #[test]
    fn test_update_locks_scoring_when_active() {
        let today = date(2025, 1, 12);
        let comp = competition(date(2025, 1, 10), date(2025, 1, 16), today);

        let req = UpdateCompetitionRequest {
            scoring_type: Some(ScoringType::StepCount),
            ..UpdateCompetitionRequest::default()
        };
        assert!(apply_update(&comp, &req, today).is_err());
    }

    #[test]
    fn test_update_allows_end_date_when_active() {
        let today = date(2025, 1, 12);
        let comp = competition(date(2025, 1, 10), date(2025, 1, 16), today);

        let req = UpdateCompetitionRequest {
            end_date: Some(date(2025, 1, 20)),
            ..UpdateCompetitionRequest::default()
        };
        let changes = apply_update(&comp, &req, today).expect("end date edit allowed");
        assert_eq!(changes.end_date, date(2025, 1, 20));
        // span is no longer 7 days, so the derived type changes with it
        assert_eq!(changes.competition_type, CompetitionType::Custom);
    }

    #[test]
    fn test_update_rejects_everything_when_completed() {
        let today = date(2025, 2, 1);
        let comp = competition(date(2025, 1, 10), date(2025, 1, 16), date(2025, 1, 10));

        let req = UpdateCompetitionRequest {
            name: Some("Renamed".to_string()),
            ..UpdateCompetitionRequest::default()
        };
        assert!(apply_update(&comp, &req, today).is_err());
    }

    #[test]
    fn test_update_everything_mutable_while_upcoming() {
        let today = date(2025, 1, 1);
        let comp = competition(date(2025, 1, 10), date(2025, 1, 16), today);

        let req = UpdateCompetitionRequest {
            name: Some("Renamed".to_string()),
            start_date: Some(date(2025, 1, 11)),
            end_date: Some(date(2025, 1, 17)),
            scoring_type: Some(ScoringType::Percentage),
            is_public: Some(false),
            ..UpdateCompetitionRequest::default()
        };
        let changes = apply_update(&comp, &req, today).expect("upcoming edit allowed");
        assert_eq!(changes.name, "Renamed");
        assert_eq!(changes.scoring_type, ScoringType::Percentage);
        assert_eq!(changes.competition_type, CompetitionType::Weekly);
        assert!(!changes.is_public);
    }

    #[test]
    fn test_public_join_gates() {
        let today = date(2025, 1, 12);

        let mut private = competition(date(2025, 1, 20), date(2025, 1, 26), today);
        private.is_public = false;
        assert_eq!(check_public_join(&private, today), Err(JoinRefusal::NotPublic));

        let completed = competition(date(2025, 1, 1), date(2025, 1, 7), today);
        assert_eq!(
            check_public_join(&completed, today),
            Err(JoinRefusal::AlreadyCompleted)
        );

        let started_weekly = competition(date(2025, 1, 10), date(2025, 1, 16), today);
        assert_eq!(
            check_public_join(&started_weekly, today),
            Err(JoinRefusal::AlreadyStarted)
        );

        // custom competitions admit latecomers
        let started_custom = competition(date(2025, 1, 10), date(2025, 1, 13), today);
        assert_eq!(started_custom.competition_type, CompetitionType::Custom);
        assert!(check_public_join(&started_custom, today).is_ok());

        let upcoming = competition(date(2025, 1, 20), date(2025, 1, 26), today);
        assert!(check_public_join(&upcoming, today).is_ok());
    }
}
