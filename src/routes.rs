use crate::state::RosterState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod index;
pub mod roster;

pub fn router(state: RosterState) -> Router {
    Router::new()
        .route("/", get(index::get_index_route))
        .route("/internal/roster/{view}", get(roster::internal_get_roster))
        .route("/internal/roster/{view}/add", post(roster::internal_post_add))
        .route("/internal/roster/{view}/edit", post(roster::internal_post_edit))
        .route("/internal/roster/{view}/close", post(roster::internal_post_close))
        .route(
            "/internal/roster/{view}/student",
            delete(roster::internal_delete_student),
        )
        .route(
            "/internal/roster/{view}/editor",
            patch(roster::internal_patch_editor).put(roster::internal_put_editor),
        )
        .route(
            "/internal/roster/{view}/unmount",
            post(roster::internal_post_unmount),
        )
        .with_state(state)
}
