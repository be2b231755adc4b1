//! Fan-out of storage-handle notifications to attached views.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{instrument, warn};

/// Identity of an outline's backing storage.
///
/// A fresh handle is minted whenever the backing storage is replaced;
/// attached views compare handles to decide whether they must re-bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreHandle(u64);

static NEXT_STORE: AtomicU64 = AtomicU64::new(1);

impl StoreHandle {
    pub(crate) fn next() -> Self {
        Self(NEXT_STORE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Observer supplied by the presentation layer.
///
/// The engine never inspects a view beyond calling this method; views
/// never mutate the outline through it.
pub trait OutlineView {
    /// The outline's backing storage was replaced.
    fn store_changed(&self, store: StoreHandle);
}

/// Ordered set of attached views, keyed by `Rc` pointer identity.
///
/// Notification order is registration order. Duplicate attach and missing
/// detach are tolerated and only logged.
#[derive(Default)]
pub struct ViewRegistry {
    views: Vec<Rc<dyn OutlineView>>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Register a view for storage-handle notifications.
    ///
    /// Re-attaching an already-registered view is a no-op.
    pub fn attach(&mut self, view: Rc<dyn OutlineView>) {
        if self.views.iter().any(|v| Rc::ptr_eq(v, &view)) {
            warn!("view is already attached, ignoring duplicate registration");
            return;
        }
        self.views.push(view);
    }

    /// Unregister a view.
    ///
    /// Detaching a view that was never attached is a no-op.
    pub fn detach(&mut self, view: &Rc<dyn OutlineView>) {
        match self.views.iter().position(|v| Rc::ptr_eq(v, view)) {
            Some(position) => {
                self.views.remove(position);
            }
            None => {
                warn!("view is not attached, ignoring detach");
            }
        }
    }

    /// Drop every registration. Used when the owning collaborator releases
    /// the outline.
    pub fn detach_all(&mut self) {
        self.views.clear();
    }

    /// Fan the new storage handle out to every attached view, in
    /// registration order. All views see the change; there is no partial
    /// notification.
    #[instrument(level = "trace", skip(self))]
    pub fn notify(&self, store: StoreHandle) {
        for view in &self.views {
            view.store_changed(store);
        }
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.views.len())
            .finish()
    }
}
