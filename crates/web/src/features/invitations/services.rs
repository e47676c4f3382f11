use sqlx::PgPool;
use storage::{
    error::StorageError,
    models::{Invitation, InvitationStatus},
    repository::invitation::InvitationRepository,
    repository::participant::ParticipantRepository,
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

pub async fn list_pending(pool: &PgPool, user_id: Uuid) -> WebResult<Vec<Invitation>> {
    let invitations = InvitationRepository::new(pool)
        .list_pending_for_user(user_id)
        .await?;
    Ok(invitations)
}

/// Record the invitee's answer. Accepting enrolls them in the competition.
pub async fn respond(
    pool: &PgPool,
    invitation_id: Uuid,
    user_id: Uuid,
    accept: bool,
) -> WebResult<Invitation> {
    let invitations = InvitationRepository::new(pool);
    let invitation = invitations.find_by_id(invitation_id).await?;

    if invitation.invitee_id != user_id {
        return Err(WebError::Forbidden(
            "Only the invited user can answer this invitation".to_string(),
        ));
    }
    if invitation.status != InvitationStatus::Pending {
        return Err(WebError::Conflict("Invitation already answered".to_string()));
    }

    let status = if accept {
        InvitationStatus::Accepted
    } else {
        InvitationStatus::Declined
    };

    // claim the pending invitation first so a double-tap cannot answer twice
    let invitation = invitations.respond(invitation_id, status).await?;

    if accept {
        match ParticipantRepository::new(pool)
            .insert(invitation.competition_id, user_id)
            .await
        {
            Ok(_) => {}
            // joined through another path since the invite went out
            Err(StorageError::ConstraintViolation(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(invitation)
}
