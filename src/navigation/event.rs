//! Router notifications.

use crate::navigation::definition::Navigation;

/// Events broadcast by the router.
///
/// Subscribers that lag behind lose the oldest events; the router never
/// waits on them.
#[derive(Debug, Clone, PartialEq)]
pub enum RouterEvent {
    /// No registered route parsed the location.
    RouteNotFound { path: String },
    /// A route callback completed.
    Navigated(Navigation),
    /// A before-hook cancelled a navigation and redirected it.
    Redirected { from: String, to: String },
    /// A callback or before-hook failed; the queue moves on.
    Failed { path: String, error: String },
}

/// Handle returned by [`Router::listen`](crate::navigation::Router::listen).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);
