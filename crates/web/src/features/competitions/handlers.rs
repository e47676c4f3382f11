use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use storage::dto::{
    competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
    invitation::{InvitationResponse, InviteRequest},
    standings::StandingsEntry,
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthedUser;
use crate::state::AppState;

use super::services;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/competitions",
    params(
        ("limit" = Option<i64>, Query, description = "Maximum number of competitions to return")
    ),
    responses(
        (status = 200, description = "List public competitions", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CompetitionResponse>>, WebError> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let competitions = services::list_public_competitions(state.db.pool(), limit).await?;
    Ok(Json(competitions))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Competition found", body = CompetitionResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let competition = services::get_competition(state.db.pool(), id).await?;
    Ok(Json(competition).into_response())
}

#[utoipa::path(
    get,
    path = "/api/competitions/{id}/standings",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    responses(
        (status = 200, description = "Leaderboard ranked by total points", body = Vec<StandingsEntry>),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn get_standings(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let standings = services::get_standings(state.db.pool(), id).await?;
    Ok(Json(standings).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Competition created successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<CreateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let competition = services::create_competition(&state, user.user_id, &req).await?;

    Ok((StatusCode::CREATED, Json(competition)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = UpdateCompetitionRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Competition updated successfully", body = CompetitionResponse),
        (status = 400, description = "Validation error or field locked by status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requester is not the creator"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompetitionRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let updated = services::update_competition(state.db.pool(), id, user.user_id, &req).await?;
    Ok(Json(updated).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{id}",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Competition deleted successfully"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Requester is not the creator"),
        (status = 404, description = "Competition not found")
    ),
    tag = "competitions"
)]
pub async fn delete_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::delete_competition(state.db.pool(), id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/join",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Joined the competition", body = CompetitionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Competition is not public"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Already a participant or competition not joinable")
    ),
    tag = "competitions"
)]
pub async fn join_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let competition = services::join_competition(&state, id, user.user_id).await?;
    Ok(Json(competition).into_response())
}

#[utoipa::path(
    post,
    path = "/api/competitions/{id}/invitations",
    params(
        ("id" = Uuid, Path, description = "Competition ID")
    ),
    request_body = InviteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Invitation created", body = InvitationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Inviter is not a participant"),
        (status = 404, description = "Competition not found"),
        (status = 409, description = "Duplicate invitation or already a participant")
    ),
    tag = "competitions"
)]
pub async fn invite_to_competition(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<Response, WebError> {
    let invitation =
        services::invite_to_competition(&state, id, user.user_id, req.invitee_id).await?;

    Ok((StatusCode::CREATED, Json(InvitationResponse::from(invitation))).into_response())
}
