use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::dto::sync::{SyncRequest, SyncResponse};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthedUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/sync",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = SyncRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Metrics recorded and standings refreshed", body = SyncResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found or caller is not a participant"),
        (status = 409, description = "A sync for this competition is already in progress")
    ),
    tag = "sync"
)]
pub async fn sync_metrics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<SyncRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::sync_metrics(&state, id, user.user_id, &req).await?;
    Ok(Json(response).into_response())
}
