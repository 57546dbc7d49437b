//! Fragment routing with a single-active-view lifecycle.
//!
//! A [`Router`] owns an ordered route table. Every navigation event funnels
//! through [`Router::handle_route`], which resolves the fragment against the
//! table, tears down the previous view and mounts the next one. Resolution is
//! a linear scan in declaration order; the first entry doubles as the default
//! route for empty or unmatched fragments.

use snafu::ensure;

use crate::error::{EmptyRoutesSnafu, Result};

/// Teardown callback handed back by a mount function. Runs exactly once,
/// before the next view is mounted.
pub type Cleanup = Box<dyn FnOnce() + Send + Sync>;

/// Mount function for a route: builds the view, installs it into the shared
/// container and optionally returns a [`Cleanup`] for resources that outlive
/// the call itself (background tasks, tickers).
pub type MountFn = Box<dyn FnMut() -> Option<Cleanup> + Send + Sync>;

/// One entry in the route table: a stable path prefix plus the mount
/// function for its view.
pub struct Route {
    path: String,
    mount: MountFn,
}

impl Route {
    pub fn new(
        path: impl Into<String>,
        mount: impl FnMut() -> Option<Cleanup> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path: path.into(),
            mount: Box::new(mount),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Label shown in navigation and reported as the analytics page title:
    /// the path without its leading slash.
    pub fn label(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}

/// Best-effort page-view sink. Resolution never depends on it and never
/// waits for it.
pub trait Analytics: Send + Sync {
    fn page_view(&self, page_title: &str, page_path: &str);
}

/// Maps navigation events to view mount/unmount cycles. At most one view is
/// active at a time; its cleanup handle is the only per-route state retained
/// between events, next to the resolved path the navigation bar highlights.
pub struct Router {
    routes: Vec<Route>,
    current_cleanup: Option<Cleanup>,
    active_path: Option<String>,
    analytics: Option<Box<dyn Analytics>>,
}

impl Router {
    /// Build a router over an ordered, non-empty route table. The first
    /// entry is the default route.
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        ensure!(!routes.is_empty(), EmptyRoutesSnafu);
        Ok(Self {
            routes,
            current_cleanup: None,
            active_path: None,
            analytics: None,
        })
    }

    /// Install the optional analytics collaborator.
    pub fn with_analytics(mut self, analytics: impl Analytics + 'static) -> Self {
        self.analytics = Some(Box::new(analytics));
        self
    }

    /// The route table, in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Path of the route mounted by the most recent [`handle_route`] call.
    /// Navigation links whose target equals this path are marked active.
    ///
    /// [`handle_route`]: Router::handle_route
    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    /// Run one resolution cycle for a navigation event and return the
    /// resolved path.
    ///
    /// An absent or empty fragment stands in for the default route's path.
    /// The previous view's cleanup, if any, runs to completion before the
    /// resolved route's mount function executes; re-resolving the same route
    /// is a full cycle, never a no-op.
    pub fn handle_route(&mut self, fragment: Option<&str>) -> &str {
        let index = match fragment {
            Some(fragment) if !fragment.is_empty() => self
                .routes
                .iter()
                .position(|route| fragment.starts_with(&route.path))
                .unwrap_or(0),
            _ => 0,
        };
        let path = self.routes[index].path.clone();

        if let Some(analytics) = &self.analytics {
            analytics.page_view(self.routes[index].label(), &path);
        }

        self.active_path = Some(path);

        if let Some(cleanup) = self.current_cleanup.take() {
            cleanup();
        }

        self.current_cleanup = (self.routes[index].mount)();
        self.routes[index].path()
    }

    /// Run the held cleanup, if any, without mounting a replacement. Called
    /// on shutdown so background tasks do not outlive the terminal.
    pub fn teardown(&mut self) {
        if let Some(cleanup) = self.current_cleanup.take() {
            cleanup();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording_route(path: &'static str, log: &Log, with_cleanup: bool) -> Route {
        let log = Arc::clone(log);
        Route::new(path, move || {
            log.lock().unwrap().push(format!("mount {path}"));
            if with_cleanup {
                let log = Arc::clone(&log);
                let cleanup: Cleanup =
                    Box::new(move || log.lock().unwrap().push(format!("cleanup {path}")));
                Some(cleanup)
            } else {
                None
            }
        })
    }

    fn entries(log: &Log) -> Vec<String> {
        log.lock().unwrap().clone()
    }

    #[test]
    fn empty_route_table_is_rejected() {
        assert!(Router::new(Vec::new()).is_err());
    }

    #[test]
    fn prefix_match_and_unmatched_fallback() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/a", &log, false),
            recording_route("/b", &log, false),
        ])
        .unwrap();

        assert_eq!(router.handle_route(Some("/b")), "/b");
        assert_eq!(router.handle_route(Some("/c")), "/a");
        assert_eq!(entries(&log), ["mount /b", "mount /a"]);
    }

    #[test]
    fn fragment_suffix_still_matches_prefix() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/a", &log, false),
            recording_route("/b", &log, false),
        ])
        .unwrap();

        assert_eq!(router.handle_route(Some("/b/deep/link?x=1")), "/b");
    }

    #[test]
    fn empty_fragment_mounts_default_and_marks_it_active() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/a", &log, false),
            recording_route("/b", &log, false),
        ])
        .unwrap();

        assert_eq!(router.active_path(), None);
        assert_eq!(router.handle_route(None), "/a");
        assert_eq!(router.active_path(), Some("/a"));

        assert_eq!(router.handle_route(Some("")), "/a");
        assert_eq!(router.active_path(), Some("/a"));
    }

    #[test]
    fn cleanup_runs_before_next_mount() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/a", &log, true),
            recording_route("/b", &log, false),
        ])
        .unwrap();

        router.handle_route(Some("/a"));
        router.handle_route(Some("/b"));
        assert_eq!(entries(&log), ["mount /a", "cleanup /a", "mount /b"]);
    }

    #[test]
    fn same_route_retrigger_is_a_full_cycle() {
        let log: Log = Log::default();
        let mut router =
            Router::new(vec![recording_route("/a", &log, true)]).unwrap();

        router.handle_route(Some("/a"));
        router.handle_route(Some("/a"));
        assert_eq!(entries(&log), ["mount /a", "cleanup /a", "mount /a"]);
    }

    #[test]
    fn each_cleanup_runs_exactly_once() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/a", &log, true),
            recording_route("/b", &log, true),
        ])
        .unwrap();

        router.handle_route(Some("/a"));
        router.handle_route(Some("/b"));
        router.handle_route(Some("/a"));
        router.teardown();
        // A second teardown must not run anything twice.
        router.teardown();

        assert_eq!(
            entries(&log),
            [
                "mount /a",
                "cleanup /a",
                "mount /b",
                "cleanup /b",
                "mount /a",
                "cleanup /a",
            ]
        );
    }

    #[test]
    fn overlapping_prefixes_first_declared_wins() {
        let log: Log = Log::default();
        let mut router = Router::new(vec![
            recording_route("/json", &log, false),
            recording_route("/jsonpath", &log, false),
        ])
        .unwrap();

        // "/jsonpath" is shadowed by the earlier "/json" prefix. Declaration
        // order is observable behavior.
        assert_eq!(router.handle_route(Some("/jsonpath")), "/json");
    }

    #[derive(Default)]
    struct RecordingAnalytics(Mutex<Vec<(String, String)>>);

    impl Analytics for Arc<RecordingAnalytics> {
        fn page_view(&self, page_title: &str, page_path: &str) {
            self.0
                .lock()
                .unwrap()
                .push((page_title.to_string(), page_path.to_string()));
        }
    }

    #[test]
    fn page_views_are_reported_per_resolution() {
        let log: Log = Log::default();
        let views = Arc::new(RecordingAnalytics::default());
        let mut router = Router::new(vec![
            recording_route("/a", &log, false),
            recording_route("/b", &log, false),
        ])
        .unwrap()
        .with_analytics(Arc::clone(&views));

        router.handle_route(None);
        router.handle_route(Some("/b"));

        let seen = views.0.lock().unwrap().clone();
        assert_eq!(
            seen,
            [
                ("a".to_string(), "/a".to_string()),
                ("b".to_string(), "/b".to_string()),
            ]
        );
    }
}
