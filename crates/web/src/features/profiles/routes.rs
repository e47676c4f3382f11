use axum::{Router, middleware, routing::{get, put}};

use super::handlers::{get_profile, update_goals};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile))
        .route("/goals", put(update_goals))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ))
}
