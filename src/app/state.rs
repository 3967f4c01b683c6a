use crate::model::Catalog;
use crate::navigation::NavState;
use crate::render::Transition;
use crate::retry::CancellationToken;

/// Core application state. The catalog is an immutable session snapshot;
/// everything mutable here is navigation bookkeeping.
pub struct App {
    pub(super) catalog: Catalog,
    pub(super) nav: NavState,
    /// Monotonic id stamped onto chapter fetches; completions carrying a
    /// stale id are discarded.
    pub(super) request_id: u64,
    /// Slide hint for the chapter view currently being fetched.
    pub(super) pending_transition: Transition,
    /// Cancels the in-flight marker overlay on the next navigation.
    pub(super) overlay_cancel: Option<CancellationToken>,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        App {
            catalog,
            nav: NavState::Home,
            request_id: 0,
            pending_transition: Transition::None,
            overlay_cancel: None,
        }
    }

    pub fn nav(&self) -> NavState {
        self.nav
    }

    /// Invalidate any in-flight chapter fetches and return the id for the
    /// next batch.
    pub(super) fn next_request(&mut self) -> u64 {
        self.request_id = self.request_id.wrapping_add(1);
        self.request_id
    }

    pub(super) fn cancel_overlay(&mut self) {
        if let Some(cancel) = self.overlay_cancel.take() {
            cancel.cancel();
        }
    }
}
