//! History backends.
//!
//! # Data Flow
//! ```text
//! Backend (in-memory stack, server stub, ...)
//!     → HistoryAdapter::listen (pop-style changes only)
//!     → Router driver task
//!     → Router::on_change_path
//!
//! Router::push_state / replace_state
//!     → HistoryAdapter::push / replace (no change notification)
//!     → Router::on_change_path
//! ```
//!
//! # Design Decisions
//! - The router only sees this capability set, never a concrete backend
//! - `push`/`replace` never notify listeners, mirroring browser history
//! - Subscriptions are RAII handles; dropping one unsubscribes

use std::sync::Arc;

pub mod memory;
pub mod server;

pub use memory::MemoryHistory;
pub use server::{HistoryAction, StaticHistory};

/// Callback invoked with the new path when the backend changes location.
pub type PathListener = Box<dyn Fn(String) + Send + Sync>;

/// Capability set the router needs from a history backend.
pub trait HistoryAdapter: Send + Sync {
    /// The current location (path plus optional `?query`).
    fn current_path(&self) -> String;

    /// Register a listener for externally driven location changes.
    fn listen(&self, on_change: PathListener) -> Unsubscribe;

    /// Add a new entry.
    fn push(&self, path: &str);

    /// Overwrite the current entry.
    fn replace(&self, path: &str);
}

impl<T: HistoryAdapter + ?Sized> HistoryAdapter for Arc<T> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn listen(&self, on_change: PathListener) -> Unsubscribe {
        (**self).listen(on_change)
    }

    fn push(&self, path: &str) {
        (**self).push(path)
    }

    fn replace(&self, path: &str) {
        (**self).replace(path)
    }
}

/// Handle returned by [`HistoryAdapter::listen`].
///
/// The listener is removed when the handle is dropped or
/// [`unsubscribe`](Unsubscribe::unsubscribe) is called.
#[must_use = "dropping the handle removes the listener"]
pub struct Unsubscribe {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Unsubscribe {
    /// Create a handle that runs `remove` once.
    pub fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// A handle for backends that never emit changes.
    pub fn noop() -> Self {
        Self { remove: None }
    }

    /// Remove the listener now.
    pub fn unsubscribe(self) {
        drop(self)
    }
}

impl Drop for Unsubscribe {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.remove.is_some())
            .finish()
    }
}
