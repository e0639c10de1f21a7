use crate::{routes::roster::render_roster, state::RosterState};
use axum::extract::State;
use maud::{Markup, PreEscaped, html};

///Mounts a new roster view and renders the page around it.
pub async fn get_index_route(State(state): State<RosterState>) -> Markup {
    let (view, controller) = state.mount_view().await;
    let session = controller.snapshot().await;

    let unmount = format!(
        "addEventListener('pagehide', () => navigator.sendBeacon('/internal/roster/{view}/unmount'));"
    );

    state.render(html! {
        (render_roster(view, &session))
        script { (PreEscaped(unmount)) }
    })
}
