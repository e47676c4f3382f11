use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::leave::{LeaveCompetitionRequest, LeaveCompetitionResponse};
use uuid::Uuid;

use crate::error::WebError;
use crate::middleware::auth::AuthedUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/leave",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = LeaveCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Removed, or payment required — branch on `success` in the body, not on the status code", body = LeaveCompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requester is the creator"),
        (status = 404, description = "Competition not found or caller is not a participant"),
        (status = 500, description = "Removal failed after approval")
    ),
    tag = "competitions"
)]
pub async fn leave_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<LeaveCompetitionRequest>,
) -> Result<Response, WebError> {
    let response =
        services::leave_competition(&state, id, user.user_id, req.transaction_id.as_deref())
            .await?;

    Ok(Json(response).into_response())
}
