//! Redirect handle given to before-hooks.
//!
//! # Design Decisions
//! - At most one redirect per hook invocation; later calls fail with
//!   [`RouterError::MultipleRedirect`] and change nothing
//! - The history entry is written immediately, the redirected navigation
//!   runs after the hook returns
//! - Any redirect attempt cancels the original callback, even one whose
//!   target failed to resolve
//! - The handle closes when its hook completes; late calls fail with
//!   [`RouterError::RedirectClosed`] and leave history alone

use std::sync::{Arc, Mutex};

use crate::navigation::error::{RouterError, RouterResult};
use crate::navigation::router::Router;
use crate::routing::Params;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RedirectMode {
    Push,
    Replace,
}

#[derive(Debug, Default)]
struct RedirectState {
    closed: bool,
    cancelled: bool,
    target: Option<String>,
}

/// Lets a before-hook send the navigation elsewhere.
#[derive(Clone)]
pub struct Redirect {
    router: Router,
    state: Arc<Mutex<RedirectState>>,
}

impl Redirect {
    pub(crate) fn new(router: Router) -> Self {
        Self {
            router,
            state: Arc::new(Mutex::new(RedirectState::default())),
        }
    }

    /// Redirect to route `name`, replacing the current history entry.
    pub fn replace(&self, name: &str, params: &Params, query: &Params) -> RouterResult<()> {
        self.redirect(RedirectMode::Replace, name, params, query)
    }

    /// Redirect to route `name`, adding a history entry.
    pub fn push(&self, name: &str, params: &Params, query: &Params) -> RouterResult<()> {
        self.redirect(RedirectMode::Push, name, params, query)
    }

    /// Returns `true` once a redirect has been attempted.
    pub fn is_cancelled(&self) -> bool {
        self.lock().cancelled
    }

    /// The location the navigation was redirected to, if any.
    pub(crate) fn target(&self) -> Option<String> {
        self.lock().target.clone()
    }

    /// Reject every later call, including from clones.
    pub(crate) fn close(&self) {
        self.lock().closed = true;
    }

    fn redirect(
        &self,
        mode: RedirectMode,
        name: &str,
        params: &Params,
        query: &Params,
    ) -> RouterResult<()> {
        {
            let mut state = self.lock();
            if state.closed {
                tracing::warn!(route = %name, "Redirect rejected, before-hook already completed");
                return Err(RouterError::RedirectClosed);
            }
            if state.cancelled {
                tracing::warn!(route = %name, "Redirect rejected, hook already redirected");
                return Err(RouterError::MultipleRedirect);
            }
            state.cancelled = true;
        }

        let path = self.router.resolve(name, params, query)?;
        match mode {
            RedirectMode::Push => self.router.history().push(&path),
            RedirectMode::Replace => self.router.history().replace(&path),
        }
        tracing::debug!(route = %name, path = %path, mode = ?mode, "Before-hook redirected");

        self.lock().target = Some(path);
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RedirectState> {
        self.state.lock().expect("redirect mutex poisoned")
    }
}

impl std::fmt::Debug for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Redirect")
            .field("closed", &state.closed)
            .field("cancelled", &state.cancelled)
            .field("target", &state.target)
            .finish()
    }
}
