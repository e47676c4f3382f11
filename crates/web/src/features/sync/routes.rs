use axum::{Router, middleware, routing::post};

use super::handlers::sync_metrics;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/:id/sync", post(sync_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ))
}
