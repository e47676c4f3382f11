use chrono::Utc;
use storage::{
    dto::sync::{SyncRequest, SyncResponse},
    models::CompetitionStatus,
    repository::competition::CompetitionRepository,
    repository::participant::ParticipantRepository,
    services::sync as sync_service,
};
use uuid::Uuid;

use crate::collaborators::notify::SocialEvent;
use crate::error::{WebError, WebResult};
use crate::state::AppState;

/// Record a batch of health-provider samples and refresh the caller's
/// standings. One sync per (competition, user) runs at a time; a second
/// device syncing concurrently is told to retry rather than queued.
pub async fn sync_metrics(
    state: &AppState,
    competition_id: Uuid,
    user_id: Uuid,
    req: &SyncRequest,
) -> WebResult<SyncResponse> {
    let _permit = state
        .sync_guard
        .begin(competition_id, user_id)
        .ok_or_else(|| WebError::Conflict("A sync is already in progress".to_string()))?;

    let pool = state.db.pool();
    let competition = CompetitionRepository::new(pool)
        .find_by_id(competition_id)
        .await?;

    let outcome =
        sync_service::record_daily_metrics(pool, &competition, user_id, &req.days).await?;

    announce_winner_if_final(state, &competition).await;

    Ok(SyncResponse {
        days_recorded: outcome.days_recorded,
        days_skipped: outcome.days_skipped,
        total_points: outcome.totals.total_points,
    })
}

/// After a sync lands on a finished competition, congratulate the current
/// leader. The per-competition TTL mark keeps this to one announcement per
/// window instead of one per trailing sync.
async fn announce_winner_if_final(state: &AppState, competition: &storage::models::Competition) {
    let today = Utc::now().date_naive();
    if competition.effective_status(today) != CompetitionStatus::Completed {
        return;
    }
    if !state.winner_marks.try_mark(competition.competition_id) {
        return;
    }

    let leader = match ParticipantRepository::new(state.db.pool())
        .list_by_points(competition.competition_id)
        .await
    {
        Ok(participants) => participants.into_iter().next(),
        Err(e) => {
            tracing::warn!(
                competition_id = %competition.competition_id,
                error = %e,
                "failed to load standings for winner announcement"
            );
            return;
        }
    };

    if let Some(winner) = leader {
        state
            .notifier
            .notify(
                winner.user_id,
                &SocialEvent::WinnerDecided {
                    competition_id: competition.competition_id,
                    competition_name: competition.name.clone(),
                    total_points: winner.total_points,
                },
            )
            .await;
    }
}
