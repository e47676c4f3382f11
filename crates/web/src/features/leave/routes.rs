use axum::{Router, middleware, routing::post};

use super::handlers::leave_competition;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/:id/leave", post(leave_competition))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ))
}
