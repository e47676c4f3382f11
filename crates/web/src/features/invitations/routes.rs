use axum::{Router, middleware, routing::{get, post}};

use super::handlers::{list_invitations, respond_to_invitation};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_invitations))
        .route("/:id/respond", post(respond_to_invitation))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ))
}
