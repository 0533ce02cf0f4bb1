//! Route definitions handed to the router.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;

use crate::navigation::error::BoxError;
use crate::navigation::redirect::Redirect;
use crate::routing::Params;

/// Outcome of a route callback or before-hook.
pub type CallbackResult = Result<(), BoxError>;

/// Handler run when a route becomes active.
pub type RouteCallback =
    Arc<dyn Fn(Navigation) -> BoxFuture<'static, CallbackResult> + Send + Sync>;

/// Guard run before the route callback. May redirect through the handle.
pub type BeforeHook =
    Arc<dyn Fn(Navigation, Redirect) -> BoxFuture<'static, CallbackResult> + Send + Sync>;

/// Everything known about the navigation being performed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    /// Name of the matched route.
    pub name: String,
    /// Sanitized template of the matched route.
    pub template: String,
    /// The full location, including any query string.
    pub path: String,
    /// Values extracted from the pathname.
    pub params: Params,
    /// Decoded query string.
    pub query: Params,
}

/// A route to register with [`Router::add_route`](crate::navigation::Router::add_route).
///
/// ```
/// use waypoint::navigation::RouteDefinition;
///
/// let route = RouteDefinition::new("/books/{id}", |nav| async move {
///     println!("showing book {:?}", nav.params.get("id"));
///     Ok(())
/// })
/// .name("book");
/// assert_eq!(route.route_name(), "book");
/// ```
#[derive(Clone)]
pub struct RouteDefinition {
    pub(crate) path: String,
    pub(crate) name: Option<String>,
    pub(crate) callback: RouteCallback,
    pub(crate) on_before: Option<BeforeHook>,
}

impl RouteDefinition {
    /// Define a route for `path` running `callback` when it matches.
    pub fn new<F, Fut>(path: impl Into<String>, callback: F) -> Self
    where
        F: Fn(Navigation) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult> + Send + 'static,
    {
        Self {
            path: path.into(),
            name: None,
            callback: Arc::new(move |nav| callback(nav).boxed()),
            on_before: None,
        }
    }

    /// Register the route under `name` instead of its path.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Run `hook` before the callback on every match.
    pub fn on_before<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Navigation, Redirect) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = CallbackResult> + Send + 'static,
    {
        self.on_before = Some(Arc::new(move |nav, redirect| hook(nav, redirect).boxed()));
        self
    }

    /// The template this route was defined with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The name the route registers under; defaults to its path.
    pub fn route_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }

    pub fn has_before_hook(&self) -> bool {
        self.on_before.is_some()
    }
}

impl std::fmt::Debug for RouteDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteDefinition")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("on_before", &self.on_before.is_some())
            .finish()
    }
}
