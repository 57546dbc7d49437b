//! Best-effort page-view telemetry.

use viewdeck::Analytics;

/// Emits page views as structured tracing events. Losing them never affects
/// navigation; with no subscriber installed they simply vanish.
pub struct PageViews;

impl Analytics for PageViews {
    fn page_view(&self, page_title: &str, page_path: &str) {
        tracing::info!(
            target: "devdeck::analytics",
            page_title,
            page_path,
            "page_view"
        );
    }
}
