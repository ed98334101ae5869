// Navigation adapter for hosts without a router: the latest requested route is published on a
// watch.

use crate::domain::Navigator;
use tokio::sync::watch;

#[derive(Clone)]
pub struct WatchNavigator {
    route_tx: watch::Sender<Option<String>>,
}

impl WatchNavigator {
    pub fn new() -> (Self, watch::Receiver<Option<String>>) {
        let (route_tx, route_rx) = watch::channel(None);
        (Self { route_tx }, route_rx)
    }
}

impl Navigator for WatchNavigator {
    fn redirect_to(&self, route: &str) {
        tracing::info!(route, "navigating");
        self.route_tx.send_replace(Some(route.to_string()));
    }
}
