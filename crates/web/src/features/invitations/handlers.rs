use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::invitation::{InvitationResponse, RespondToInvitationRequest};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthedUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/invitations",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Pending invitations for the caller", body = Vec<InvitationResponse>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "invitations"
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Json<Vec<InvitationResponse>>, WebError> {
    let invitations = services::list_pending(state.db.pool(), user.user_id).await?;

    Ok(Json(
        invitations.into_iter().map(InvitationResponse::from).collect(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/invitations/{id}/respond",
    params(
        ("id" = Uuid, Path, description = "Invitation ID")
    ),
    request_body = RespondToInvitationRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Invitation answered", body = InvitationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the invitee"),
        (status = 404, description = "Invitation not found"),
        (status = 409, description = "Invitation already answered")
    ),
    tag = "invitations"
)]
pub async fn respond_to_invitation(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondToInvitationRequest>,
) -> Result<Response, WebError> {
    let invitation = services::respond(state.db.pool(), id, user.user_id, req.accept).await?;
    Ok(Json(InvitationResponse::from(invitation)).into_response())
}
