use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    create_competition, delete_competition, get_competition, get_standings, invite_to_competition,
    join_competition, list_competitions, update_competition,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_competition))
        .route("/:id", put(update_competition))
        .route("/:id", delete(delete_competition))
        .route("/:id/join", post(join_competition))
        .route("/:id/invitations", post(invite_to_competition))
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            require_auth,
        ));

    Router::new()
        .route("/", get(list_competitions))
        .route("/:id", get(get_competition))
        .route("/:id/standings", get(get_standings))
        .merge(protected)
}
