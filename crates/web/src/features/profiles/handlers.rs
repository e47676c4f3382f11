use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::dto::profile::{ProfileResponse, UpdateGoalsRequest};
use validator::Validate;

use crate::error::WebError;
use crate::middleware::auth::AuthedUser;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/profile",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's profile", body = ProfileResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profiles"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
) -> Result<Response, WebError> {
    let profile = services::get_profile(state.db.pool(), user.user_id).await?;
    Ok(Json(profile).into_response())
}

#[utoipa::path(
    put,
    path = "/api/profile/goals",
    request_body = UpdateGoalsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Goals updated", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "profiles"
)]
pub async fn update_goals(
    State(state): State<AppState>,
    Extension(user): Extension<AuthedUser>,
    Json(req): Json<UpdateGoalsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let profile = services::update_goals(state.db.pool(), user.user_id, &req).await?;
    Ok(Json(profile).into_response())
}
