//! One module per utility page.
//!
//! Pages share one contract: `mount` builds the page, restores its field
//! values from the store, recomputes derived output synchronously and may
//! return a cleanup for background work. Field edits persist under
//! `<route-path>/<field>` keys and recompute in place; invalid input renders
//! a muted local message and never leaves the page.

pub mod base64;
pub mod calc;
pub mod diff;
pub mod hmac;
pub mod json;
pub mod jwt;
pub mod millis;
pub mod objectid;
pub mod text;
pub mod url;
pub mod uuid;

use viewdeck::{AppContext, Store};

/// UTC instant format matching JavaScript's `toISOString`.
pub(crate) const ISO_UTC: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Everything a page needs at mount time.
#[derive(Clone)]
pub struct PageCx {
    pub store: Store,
    pub app: AppContext,
}

/// Persist one field value; a failing store write is logged and never
/// interrupts input handling.
pub(crate) fn persist(store: &Store, key: &str, value: &str) {
    if let Err(error) = store.set(key, value) {
        tracing::warn!(%error, key, "failed to persist field value");
    }
}
