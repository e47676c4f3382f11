use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{Invitation, InvitationStatus};

const INVITATION_COLUMNS: &str =
    "invitation_id, competition_id, inviter_id, invitee_id, status, created_at, responded_at";

/// Repository for competition invitations.
pub struct InvitationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InvitationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, invitation_id: Uuid) -> Result<Invitation> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS}
             FROM invitations
             WHERE invitation_id = $1"
        ))
        .bind(invitation_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(invitation)
    }

    /// Any pending invitation for this invitee in this competition. Used to
    /// de-duplicate before inserting; the check-then-insert race is accepted
    /// since a doubled invite is a nuisance, not a correctness problem.
    pub async fn find_pending(
        &self,
        competition_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS}
             FROM invitations
             WHERE competition_id = $1 AND invitee_id = $2 AND status = 'pending'"
        ))
        .bind(competition_id)
        .bind(invitee_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn insert(
        &self,
        competition_id: Uuid,
        inviter_id: Uuid,
        invitee_id: Uuid,
    ) -> Result<Invitation> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "INSERT INTO invitations (invitation_id, competition_id, inviter_id, invitee_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(competition_id)
        .bind(inviter_id)
        .bind(invitee_id)
        .fetch_one(self.pool)
        .await?;

        Ok(invitation)
    }

    /// Record the invitee's answer. Only a pending invitation can be
    /// answered.
    pub async fn respond(
        &self,
        invitation_id: Uuid,
        status: InvitationStatus,
    ) -> Result<Invitation> {
        let invitation = sqlx::query_as::<_, Invitation>(&format!(
            "UPDATE invitations
             SET status = $2, responded_at = now()
             WHERE invitation_id = $1 AND status = 'pending'
             RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(invitation_id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            StorageError::ConstraintViolation("Invitation already answered".to_string())
        })?;

        Ok(invitation)
    }

    pub async fn list_pending_for_user(&self, invitee_id: Uuid) -> Result<Vec<Invitation>> {
        let invitations = sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS}
             FROM invitations
             WHERE invitee_id = $1 AND status = 'pending'
             ORDER BY created_at DESC"
        ))
        .bind(invitee_id)
        .fetch_all(self.pool)
        .await?;

        Ok(invitations)
    }
}
