use chrono::Utc;
use sqlx::PgPool;
use storage::{
    dto::competition::{
        CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest,
    },
    dto::standings::StandingsEntry,
    models::NewCompetition,
    repository::competition::CompetitionRepository,
    repository::invitation::InvitationRepository,
    repository::participant::ParticipantRepository,
    services::lifecycle::{self, JoinRefusal},
};
use uuid::Uuid;

use crate::collaborators::notify::SocialEvent;
use crate::error::{WebError, WebResult};
use crate::state::AppState;

/// Create a competition with its derived type and status, and enroll the
/// creator as the first participant.
pub async fn create_competition(
    state: &AppState,
    creator_id: Uuid,
    req: &CreateCompetitionRequest,
) -> WebResult<CompetitionResponse> {
    let pool = state.db.pool();
    let today = Utc::now().date_naive();

    lifecycle::validate_date_span(req.start_date, req.end_date).map_err(WebError::from)?;

    let status = lifecycle::status_on(req.start_date, req.end_date, today);
    if status == storage::models::CompetitionStatus::Completed {
        return Err(WebError::BadRequest(
            "end_date must not be in the past".to_string(),
        ));
    }

    let competition = CompetitionRepository::new(pool)
        .create(&NewCompetition {
            name: req.name.clone(),
            description: req.description.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            competition_type: lifecycle::classify_type(req.start_date, req.end_date),
            status,
            scoring_type: req.scoring_type,
            scoring_config: req.scoring_config.clone(),
            is_public: req.is_public,
            creator_id,
        })
        .await?;

    ParticipantRepository::new(pool)
        .insert(competition.competition_id, creator_id)
        .await?;

    Ok(CompetitionResponse::new(competition, 1, today))
}

pub async fn list_public_competitions(
    pool: &PgPool,
    limit: i64,
) -> WebResult<Vec<CompetitionResponse>> {
    let today = Utc::now().date_naive();
    let rows = CompetitionRepository::new(pool)
        .list_public_with_counts(limit)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(competition, count)| CompetitionResponse::new(competition, count, today))
        .collect())
}

pub async fn get_competition(pool: &PgPool, id: Uuid) -> WebResult<CompetitionResponse> {
    let competition = CompetitionRepository::new(pool).find_by_id(id).await?;
    let count = ParticipantRepository::new(pool)
        .count(competition.competition_id)
        .await?;

    Ok(CompetitionResponse::new(
        competition,
        count,
        Utc::now().date_naive(),
    ))
}

/// Apply an edit under the status-dependent editability rules. Only the
/// creator may edit.
pub async fn update_competition(
    pool: &PgPool,
    id: Uuid,
    requester: Uuid,
    req: &UpdateCompetitionRequest,
) -> WebResult<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.find_by_id(id).await?;

    if competition.creator_id != requester {
        return Err(WebError::Forbidden(
            "Only the creator can edit a competition".to_string(),
        ));
    }

    let today = Utc::now().date_naive();
    let changes = lifecycle::apply_update(&competition, req, today)?;
    let updated = repo.update(id, &changes).await?;
    let count = ParticipantRepository::new(pool).count(id).await?;

    Ok(CompetitionResponse::new(updated, count, today))
}

/// Delete a competition and everything under it. Creator only.
pub async fn delete_competition(pool: &PgPool, id: Uuid, requester: Uuid) -> WebResult<()> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.find_by_id(id).await?;

    if competition.creator_id != requester {
        return Err(WebError::Forbidden(
            "Only the creator can delete a competition".to_string(),
        ));
    }

    repo.delete(id).await?;
    Ok(())
}

/// Join a public competition. All rules are enforced here, server-side;
/// the path is reachable by any authenticated identity.
pub async fn join_competition(
    state: &AppState,
    id: Uuid,
    user_id: Uuid,
) -> WebResult<CompetitionResponse> {
    let pool = state.db.pool();
    let competition = CompetitionRepository::new(pool).find_by_id(id).await?;
    let today = Utc::now().date_naive();

    lifecycle::check_public_join(&competition, today).map_err(|refusal| match refusal {
        JoinRefusal::NotPublic => {
            WebError::Forbidden("This competition is invite-only".to_string())
        }
        JoinRefusal::AlreadyCompleted => {
            WebError::Conflict("This competition has already ended".to_string())
        }
        JoinRefusal::AlreadyStarted => {
            WebError::Conflict("This competition has already started".to_string())
        }
    })?;

    ParticipantRepository::new(pool).insert(id, user_id).await?;

    state
        .notifier
        .notify(
            competition.creator_id,
            &SocialEvent::CompetitionJoined {
                competition_id: id,
                user_id,
            },
        )
        .await;

    let count = ParticipantRepository::new(pool).count(id).await?;
    Ok(CompetitionResponse::new(competition, count, today))
}

/// Invite a user. The inviter must be a participant; duplicates against an
/// existing pending invitation and existing members are refused.
pub async fn invite_to_competition(
    state: &AppState,
    competition_id: Uuid,
    inviter_id: Uuid,
    invitee_id: Uuid,
) -> WebResult<storage::models::Invitation> {
    let pool = state.db.pool();
    let competition = CompetitionRepository::new(pool)
        .find_by_id(competition_id)
        .await?;

    let participants = ParticipantRepository::new(pool);
    if participants.find(competition_id, inviter_id).await?.is_none() {
        return Err(WebError::Forbidden(
            "Only participants can send invitations".to_string(),
        ));
    }
    if participants.find(competition_id, invitee_id).await?.is_some() {
        return Err(WebError::Conflict("User is already a participant".to_string()));
    }

    let invitations = InvitationRepository::new(pool);
    if invitations
        .find_pending(competition_id, invitee_id)
        .await?
        .is_some()
    {
        return Err(WebError::Conflict(
            "An invitation is already pending for this user".to_string(),
        ));
    }

    let invitation = invitations
        .insert(competition_id, inviter_id, invitee_id)
        .await?;

    state
        .notifier
        .notify(
            invitee_id,
            &SocialEvent::InvitationReceived {
                competition_id,
                competition_name: competition.name.clone(),
                inviter_id,
            },
        )
        .await;

    Ok(invitation)
}

/// Current leaderboard, best score first.
pub async fn get_standings(pool: &PgPool, id: Uuid) -> WebResult<Vec<StandingsEntry>> {
    // surface 404 for unknown competitions rather than an empty board
    let competition = CompetitionRepository::new(pool).find_by_id(id).await?;

    let ranked = ParticipantRepository::new(pool)
        .list_by_points_with_names(competition.competition_id)
        .await?;

    Ok(ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (participant, display_name))| {
            StandingsEntry::new(idx as i64 + 1, display_name, participant)
        })
        .collect())
}
