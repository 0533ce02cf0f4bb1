//! Navigation state machine.
//!
//! # Responsibilities
//! - Register named routes and their callbacks
//! - Turn location changes into navigation cycles, one at a time
//! - Run before-hooks and honour their redirects
//! - Publish route-not-found and completion events

use std::any::Any;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock, Weak};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::{broadcast, mpsc};

use crate::history::{HistoryAdapter, Unsubscribe};
use crate::navigation::definition::{
    BeforeHook, CallbackResult, Navigation, RouteCallback, RouteDefinition,
};
use crate::navigation::error::{RouterError, RouterResult};
use crate::navigation::event::{ListenerId, RouterEvent};
use crate::navigation::query;
use crate::navigation::redirect::Redirect;
use crate::routing::{Params, Pointer, Route};

/// Capacity of the event channel before slow subscribers start lagging.
const EVENT_CAPACITY: usize = 64;

type NavigationListener = Arc<dyn Fn(&Navigation) + Send + Sync>;

/// A registered route.
#[derive(Clone)]
struct Registration {
    name: String,
    template: String,
    callback: RouteCallback,
    on_before: Option<BeforeHook>,
}

/// A registered route as seen from outside the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub name: String,
    pub template: String,
    pub has_before_hook: bool,
}

impl From<&Registration> for RouteInfo {
    fn from(reg: &Registration) -> Self {
        Self {
            name: reg.name.clone(),
            template: reg.template.clone(),
            has_before_hook: reg.on_before.is_some(),
        }
    }
}

/// Serialises navigation cycles.
///
/// While `pending` is set every new request is queued; the cycle that set
/// it drains the queue before clearing it.
#[derive(Debug, Default)]
struct NavigationState {
    pending: bool,
    queue: VecDeque<String>,
}

impl NavigationState {
    /// Pop the next queued path, or go idle if there is none.
    fn next_or_idle(&mut self) -> Option<String> {
        let next = self.queue.pop_front();
        if next.is_none() {
            self.pending = false;
        }
        next
    }
}

struct Inner {
    history: Box<dyn HistoryAdapter>,
    pointer: RwLock<Pointer>,
    routes: RwLock<Vec<Registration>>,
    listeners: Mutex<Vec<(ListenerId, NavigationListener)>>,
    next_listener_id: AtomicU64,
    navigation: Mutex<NavigationState>,
    subscription: Mutex<Option<Unsubscribe>>,
    events: broadcast::Sender<RouterEvent>,
}

/// Client-side router.
///
/// Cheap to clone; clones drive the same state.
///
/// ```
/// use waypoint::history::MemoryHistory;
/// use waypoint::navigation::{RouteDefinition, Router};
/// use waypoint::routing::Params;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), waypoint::navigation::RouterError> {
/// let history = MemoryHistory::new("/");
/// let router = Router::new(history.clone());
/// router
///     .add_route(RouteDefinition::new("/", |_| async { Ok(()) }).name("home"))?
///     .add_route(RouteDefinition::new("/books/{id:[0-9]+}", |_| async { Ok(()) }).name("book"))?;
///
/// router.init().await;
/// router.push_state("book", &Params::new().with("id", "7"), &Params::new()).await?;
/// assert_eq!(history.entries(), ["/", "/books/7"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Router {
    inner: Arc<Inner>,
}

impl Router {
    /// Create a router on top of a history backend.
    pub fn new(history: impl HistoryAdapter + 'static) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                history: Box::new(history),
                pointer: RwLock::new(Pointer::new()),
                routes: RwLock::new(Vec::new()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                navigation: Mutex::new(NavigationState::default()),
                subscription: Mutex::new(None),
                events,
            }),
        }
    }

    /// Register a route. Names must be unique; a name defaults to the path.
    pub fn add_route(&self, definition: RouteDefinition) -> RouterResult<&Self> {
        let name = definition.route_name().to_string();
        let route = Route::new(&definition.path)?;

        let mut routes = self.registrations_mut();
        if routes.iter().any(|reg| reg.name == name) {
            return Err(RouterError::DuplicateRoute(name));
        }

        let template = route.original().to_string();
        self.pointer_mut().add_route(route);
        tracing::debug!(route = %name, template = %template, "Route registered");

        routes.push(Registration {
            name,
            template,
            callback: definition.callback,
            on_before: definition.on_before,
        });
        Ok(self)
    }

    /// Look a route up by name.
    pub fn route(&self, name: &str) -> Option<RouteInfo> {
        self.registration(name).as_ref().map(RouteInfo::from)
    }

    /// Every registered route, in registration order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.registrations().iter().map(RouteInfo::from).collect()
    }

    /// Build the concrete location for route `name`.
    ///
    /// The query is appended only when it has entries.
    pub fn resolve(&self, name: &str, params: &Params, query: &Params) -> RouterResult<String> {
        let reg = self
            .registration(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        let path = self.pointer().resolve(&reg.template, params)?;
        Ok(query::append(path, query))
    }

    /// Subscribe to history changes and navigate to the current location.
    ///
    /// Must be called from within a Tokio runtime. Returns once the initial
    /// navigation, and anything it queued, has completed.
    pub async fn init(&self) {
        {
            let mut subscription = self.subscription();
            if subscription.is_some() {
                tracing::warn!("Router already initialised");
                return;
            }

            let (tx, rx) = mpsc::unbounded_channel();
            *subscription = Some(self.inner.history.listen(Box::new(move |path| {
                let _ = tx.send(path);
            })));
            tokio::spawn(drive(Arc::downgrade(&self.inner), rx));
        }

        let path = self.inner.history.current_path();
        tracing::info!(path = %path, routes = self.registrations().len(), "Router initialised");
        self.on_change_path(path).await;
    }

    /// Unsubscribe from history and drop every route, listener and queued
    /// navigation. A cycle already running finishes on its own.
    pub fn destroy(&self) {
        if let Some(subscription) = self.subscription().take() {
            subscription.unsubscribe();
        }
        self.registrations_mut().clear();
        self.pointer_mut().clear();
        self.listeners().clear();

        let dropped = {
            let mut nav = self.navigation();
            let dropped = nav.queue.len();
            nav.queue.clear();
            dropped
        };
        tracing::info!(dropped, "Router destroyed");
    }

    /// Navigate to route `name`, adding a history entry.
    pub async fn push_state(&self, name: &str, params: &Params, query: &Params) -> RouterResult<()> {
        let path = self.resolve(name, params, query)?;
        self.inner.history.push(&path);
        self.on_change_path(path).await;
        Ok(())
    }

    /// Navigate to route `name`, replacing the current history entry.
    pub async fn replace_state(
        &self,
        name: &str,
        params: &Params,
        query: &Params,
    ) -> RouterResult<()> {
        let path = self.resolve(name, params, query)?;
        self.inner.history.replace(&path);
        self.on_change_path(path).await;
        Ok(())
    }

    /// Request a navigation cycle for `path`.
    ///
    /// If a cycle is in flight the path is queued and this returns at once;
    /// otherwise this runs the cycle and drains the queue before returning.
    pub async fn on_change_path(&self, path: impl Into<String>) {
        let path = path.into();
        {
            let mut nav = self.navigation();
            if nav.pending {
                tracing::debug!(path = %path, queued = nav.queue.len() + 1, "Navigation queued");
                nav.queue.push_back(path);
                return;
            }
            nav.pending = true;
        }

        self.drain(path).await;
    }

    /// Run cycles until the queue is empty. The caller must have set
    /// `pending`.
    async fn drain(&self, first: String) {
        let mut guard = DrainGuard::new(self.clone());

        let mut next = Some(first);
        while let Some(path) = next {
            match self.change_path(&path).await {
                Ok(Some(redirected)) => {
                    next = Some(redirected);
                    continue;
                }
                Ok(None) => {}
                Err(e) => self.report_failure(&path, &e),
            }
            next = self.navigation().next_or_idle();
        }

        guard.disarm();
    }

    /// Register a listener called with every matched navigation, before its
    /// hook and callback run.
    pub fn listen(&self, listener: impl Fn(&Navigation) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners().push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Subscribe to router events.
    pub fn events(&self) -> broadcast::Receiver<RouterEvent> {
        self.inner.events.subscribe()
    }

    /// The history backend this router drives.
    pub fn history(&self) -> &dyn HistoryAdapter {
        self.inner.history.as_ref()
    }

    /// Returns `true` while a navigation cycle is running.
    pub fn is_navigating(&self) -> bool {
        self.navigation().pending
    }

    /// Number of navigations waiting behind the running one.
    pub fn queued(&self) -> usize {
        self.navigation().queue.len()
    }

    /// Run one navigation cycle. Returns the redirect target if a
    /// before-hook redirected.
    async fn change_path(&self, location: &str) -> RouterResult<Option<String>> {
        tracing::debug!(path = %location, "Navigation started");

        let (pathname, query) = query::split(location);
        let Some(matched) = self.pointer().match_path(pathname) else {
            tracing::warn!(path = %location, "Route not found");
            self.emit(RouterEvent::RouteNotFound {
                path: location.to_string(),
            });
            return Ok(None);
        };

        let reg = self
            .registrations()
            .iter()
            .find(|reg| reg.template == matched.template)
            .cloned()
            .ok_or_else(|| RouterError::UnknownRoute(matched.template.clone()))?;

        let navigation = Navigation {
            name: reg.name.clone(),
            template: matched.template,
            path: location.to_string(),
            params: matched.params,
            query,
        };
        self.notify_listeners(&navigation);

        if let Some(hook) = &reg.on_before {
            let redirect = Redirect::new(self.clone());
            let result = guarded(hook(navigation.clone(), redirect.clone())).await;
            redirect.close();

            if let Some(target) = redirect.target() {
                if let Err(e) = result {
                    self.report_failure(location, &e);
                }
                tracing::debug!(from = %location, to = %target, "Navigation redirected");
                self.emit(RouterEvent::Redirected {
                    from: location.to_string(),
                    to: target.clone(),
                });
                return Ok(Some(target));
            }

            result?;
            if redirect.is_cancelled() {
                tracing::debug!(path = %location, "Navigation cancelled by before-hook");
                return Ok(None);
            }
        }

        guarded((reg.callback)(navigation.clone())).await?;
        tracing::debug!(route = %navigation.name, path = %location, "Navigation finished");
        self.emit(RouterEvent::Navigated(navigation));
        Ok(None)
    }

    fn notify_listeners(&self, navigation: &Navigation) {
        let listeners: Vec<NavigationListener> =
            self.listeners().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            if let Err(panic) = std::panic::catch_unwind(AssertUnwindSafe(|| listener(navigation)))
            {
                let error = RouterError::Listener(panic_message(panic.as_ref()));
                self.report_failure(&navigation.path, &error);
            }
        }
    }

    fn report_failure(&self, path: &str, error: &RouterError) {
        tracing::error!(path = %path, error = %error, "Navigation failed");
        self.emit(RouterEvent::Failed {
            path: path.to_string(),
            error: error.to_string(),
        });
    }

    fn emit(&self, event: RouterEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn registration(&self, name: &str) -> Option<Registration> {
        self.registrations().iter().find(|reg| reg.name == name).cloned()
    }

    fn pointer(&self) -> std::sync::RwLockReadGuard<'_, Pointer> {
        self.inner.pointer.read().expect("pointer lock poisoned")
    }

    fn pointer_mut(&self) -> std::sync::RwLockWriteGuard<'_, Pointer> {
        self.inner.pointer.write().expect("pointer lock poisoned")
    }

    fn registrations(&self) -> std::sync::RwLockReadGuard<'_, Vec<Registration>> {
        self.inner.routes.read().expect("routes lock poisoned")
    }

    fn registrations_mut(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Registration>> {
        self.inner.routes.write().expect("routes lock poisoned")
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<(ListenerId, NavigationListener)>> {
        self.inner.listeners.lock().expect("listeners mutex poisoned")
    }

    fn navigation(&self) -> MutexGuard<'_, NavigationState> {
        self.inner.navigation.lock().expect("navigation mutex poisoned")
    }

    fn subscription(&self) -> MutexGuard<'_, Option<Unsubscribe>> {
        self.inner.subscription.lock().expect("subscription mutex poisoned")
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.registrations().len())
            .field("navigating", &self.is_navigating())
            .field("queued", &self.queued())
            .finish()
    }
}

/// Feed history changes into the router until the subscription is dropped.
async fn drive(inner: Weak<Inner>, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(path) = rx.recv().await {
        let Some(inner) = inner.upgrade() else {
            break;
        };
        Router { inner }.on_change_path(path).await;
    }
    tracing::debug!("History driver stopped");
}

/// Await a callback future, turning errors and panics into `RouterError`.
async fn guarded(future: BoxFuture<'static, CallbackResult>) -> RouterResult<()> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result.map_err(RouterError::Callback),
        Err(panic) => Err(RouterError::Callback(
            format!("callback panicked: {}", panic_message(panic.as_ref())).into(),
        )),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Keeps the queue alive when a draining future is dropped mid-cycle.
///
/// If the drain loop does not run to completion (its future was dropped
/// by a timeout or `select!`, or it unwound) the remaining queue is
/// handed to a fresh task, or the router goes idle when nothing is left.
struct DrainGuard {
    router: Router,
    armed: bool,
}

impl DrainGuard {
    fn new(router: Router) -> Self {
        Self {
            router,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let next = match self.router.inner.navigation.lock() {
            Ok(mut nav) => nav.next_or_idle(),
            Err(_) => return,
        };
        let Some(path) = next else {
            tracing::warn!("Navigation abandoned mid-cycle");
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(next = %path, "Navigation abandoned mid-cycle, resuming queue");
                let router = self.router.clone();
                handle.spawn(async move { router.drain(path).await });
            }
            Err(_) => {
                if let Ok(mut nav) = self.router.inner.navigation.lock() {
                    let dropped = nav.queue.len() + 1;
                    nav.queue.clear();
                    nav.pending = false;
                    tracing::warn!(dropped, "Navigation abandoned outside a runtime, queue dropped");
                }
            }
        }
    }
}
