use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Invitation, InvitationStatus};

/// Request payload for inviting a user to a competition.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct InviteRequest {
    pub invitee_id: Uuid,
}

/// Request payload for answering an invitation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RespondToInvitationRequest {
    pub accept: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvitationResponse {
    pub invitation_id: Uuid,
    pub competition_id: Uuid,
    pub inviter_id: Uuid,
    pub invitee_id: Uuid,
    pub status: InvitationStatus,
    pub created_at: chrono::NaiveDateTime,
    pub responded_at: Option<chrono::NaiveDateTime>,
}

impl From<Invitation> for InvitationResponse {
    fn from(inv: Invitation) -> Self {
        Self {
            invitation_id: inv.invitation_id,
            competition_id: inv.competition_id,
            inviter_id: inv.inviter_id,
            invitee_id: inv.invitee_id,
            status: inv.status,
            created_at: inv.created_at,
            responded_at: inv.responded_at,
        }
    }
}
