//! Server-side history stub.
//!
//! Serves one fixed location and never emits changes. Pushes and replaces
//! are recorded so a renderer can turn a before-hook redirect into an HTTP
//! redirect.

use std::sync::{Arc, Mutex};

use crate::history::{HistoryAdapter, PathListener, Unsubscribe};

/// A navigation the router asked the backend to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Push(String),
    Replace(String),
}

impl HistoryAction {
    pub fn path(&self) -> &str {
        match self {
            HistoryAction::Push(path) | HistoryAction::Replace(path) => path,
        }
    }
}

#[derive(Debug)]
struct StaticState {
    location: String,
    actions: Vec<HistoryAction>,
}

/// History backend for rendering a single request.
#[derive(Debug, Clone)]
pub struct StaticHistory {
    state: Arc<Mutex<StaticState>>,
}

impl StaticHistory {
    /// Create a stub serving `location`.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StaticState {
                location: location.into(),
                actions: Vec::new(),
            })),
        }
    }

    /// Every push/replace performed, in order.
    pub fn actions(&self) -> Vec<HistoryAction> {
        self.lock().actions.clone()
    }

    /// Returns the final location if it differs from the requested one.
    pub fn redirect_target(&self) -> Option<String> {
        self.lock().actions.last().map(|a| a.path().to_string())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StaticState> {
        self.state.lock().expect("static history mutex poisoned")
    }
}

impl HistoryAdapter for StaticHistory {
    fn current_path(&self) -> String {
        self.lock().location.clone()
    }

    fn listen(&self, _on_change: PathListener) -> Unsubscribe {
        Unsubscribe::noop()
    }

    fn push(&self, path: &str) {
        let mut state = self.lock();
        state.location = path.to_string();
        state.actions.push(HistoryAction::Push(path.to_string()));
    }

    fn replace(&self, path: &str) {
        let mut state = self.lock();
        state.location = path.to_string();
        state.actions.push(HistoryAction::Replace(path.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_actions() {
        let history = StaticHistory::new("/login");
        assert_eq!(history.redirect_target(), None);

        history.replace("/dashboard");
        assert_eq!(history.current_path(), "/dashboard");
        assert_eq!(history.actions(), [HistoryAction::Replace("/dashboard".into())]);
        assert_eq!(history.redirect_target().as_deref(), Some("/dashboard"));
    }
}
