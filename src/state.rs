use crate::{
    api::StudentsClient,
    config::RuntimeConfiguration,
    error::{MissingViewSnafu, RosterResult},
    roster::RosterController,
};
use maud::{DOCTYPE, Markup, html};
use snafu::OptionExt;
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    sync::RwLock,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use uuid::Uuid;

#[derive(Debug)]
struct MountedView {
    controller: Arc<RosterController>,
    last_touched: Instant,
}

///Every mounted roster view, by id. A view lives from the page load until its `pagehide` beacon, until it has
///gone idle for too long, or until shutdown.
#[derive(Clone, Debug)]
pub struct RosterState {
    client: StudentsClient,
    views: Arc<RwLock<HashMap<Uuid, MountedView>>>,
}

impl RosterState {
    pub fn new(config: &RuntimeConfiguration) -> Self {
        Self {
            client: StudentsClient::new(config.api_config()),
            views: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    title { "Student List" }
                }
                body {
                    (markup)
                }
            }
        }
    }

    pub async fn mount_view(&self) -> (Uuid, Arc<RosterController>) {
        let controller = Arc::new(RosterController::mount(self.client.clone()).await);
        let id = Uuid::new_v4();

        self.views.write().await.insert(
            id,
            MountedView {
                controller: controller.clone(),
                last_touched: Instant::now(),
            },
        );
        info!(%id, "Mounted roster view");

        (id, controller)
    }

    ///Also counts as activity for the idle sweep.
    pub async fn get_view(&self, id: Uuid) -> RosterResult<Arc<RosterController>> {
        let mut views = self.views.write().await;
        let view = views.get_mut(&id).context(MissingViewSnafu { id })?;
        view.last_touched = Instant::now();

        Ok(view.controller.clone())
    }

    pub async fn unmount_view(&self, id: Uuid) {
        if self.views.write().await.remove(&id).is_some() {
            info!(%id, "Unmounted roster view");
        }
    }

    ///Drops every view that hasn't been touched for `max_idle`, returning how many went.
    pub async fn evict_idle_views(&self, max_idle: Duration) -> usize {
        let mut views = self.views.write().await;
        let before = views.len();
        views.retain(|_, view| view.last_touched.elapsed() < max_idle);

        let evicted = before - views.len();
        if evicted > 0 {
            info!(evicted, remaining = views.len(), "Evicted idle roster views");
        }
        evicted
    }

    ///Sweeps idle views in the background, a couple of times per `max_idle`.
    pub fn spawn_idle_view_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let state = self.clone();
        let period = (max_idle / 2).max(Duration::from_millis(10));

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                state.evict_idle_views(max_idle).await;
            }
        })
    }

    pub async fn sensible_shutdown(&self) {
        let mut views = self.views.write().await;
        info!(count = views.len(), "Dropping roster views");
        views.clear();
    }
}
