//! Route registry.
//!
//! # Responsibilities
//! - Store compiled routes keyed by their sanitized template
//! - Find the first registered route that parses a path
//! - Resolve a template back into a concrete path
//!
//! # Design Decisions
//! - Insertion order is match priority; no specificity scoring
//! - Re-adding a template replaces the route but keeps its priority slot
//! - A miss is an explicit `None`, never a silent default

use std::sync::Arc;

use crate::config::RouteConfig;
use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;
use crate::routing::route::Route;
use crate::routing::sanitize::sanitize;

/// A successful match of a path against a registered route.
#[derive(Debug, Clone)]
pub struct PointerMatch {
    /// Values extracted from the path.
    pub params: Params,
    /// The route that matched.
    pub route: Arc<Route>,
    /// The sanitized template of the matched route (e.g. `/users/{id:[0-9]+}`).
    pub template: String,
    /// The path that was matched (e.g. `/users/7`).
    pub path: String,
}

/// An ordered collection of compiled routes.
///
/// ```
/// use waypoint::routing::Pointer;
///
/// let mut pointer = Pointer::new();
/// pointer.add("/users/{id:[0-9]+}")?.add("/users/{name}")?;
///
/// let matched = pointer.match_path("/users/42").unwrap();
/// assert_eq!(matched.template, "/users/{id:[0-9]+}");
/// assert_eq!(matched.params.get("id"), Some("42"));
/// # Ok::<(), waypoint::routing::RouteError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    routes: Vec<Arc<Route>>,
}

impl Pointer {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a route manifest, in manifest order.
    pub fn from_config(routes: &[RouteConfig]) -> RouteResult<Self> {
        let mut pointer = Self::new();
        for route in routes {
            pointer.add(&route.path)?;
        }
        Ok(pointer)
    }

    /// Compile a template and register it.
    pub fn add(&mut self, template: &str) -> RouteResult<&mut Self> {
        let route = Route::new(template)?;
        Ok(self.add_route(route))
    }

    /// Register a precompiled route.
    pub fn add_route(&mut self, route: impl Into<Arc<Route>>) -> &mut Self {
        let route = route.into();

        match self.position(route.original()) {
            Some(index) => self.routes[index] = route,
            None => self.routes.push(route),
        }
        self
    }

    /// Look a route up by template.
    pub fn get(&self, template: &str) -> Option<Arc<Route>> {
        let template = sanitize(template);
        self.routes
            .iter()
            .find(|route| route.original() == template)
            .cloned()
    }

    /// Look a route up by template, failing if it is not registered.
    pub fn get_or_fail(&self, template: &str) -> RouteResult<Arc<Route>> {
        self.get(template)
            .ok_or_else(|| RouteError::RouteNotFound(template.to_string()))
    }

    /// Resolve a registered template with the given params.
    pub fn resolve(&self, template: &str, params: &Params) -> RouteResult<String> {
        let route = self.get_or_fail(template)?;
        route.resolve(params).ok_or_else(|| RouteError::Unresolvable {
            template: route.original().to_string(),
        })
    }

    /// Returns the first route, in insertion order, that parses `path`.
    pub fn match_path(&self, path: &str) -> Option<PointerMatch> {
        self.routes.iter().find_map(|route| Self::try_match(route, path))
    }

    /// Returns every route that parses `path`, in priority order.
    pub fn matches(&self, path: &str) -> Vec<PointerMatch> {
        self.routes
            .iter()
            .filter_map(|route| Self::try_match(route, path))
            .collect()
    }

    /// Returns `true` if any route parses `path`.
    pub fn test(&self, path: &str) -> bool {
        self.routes.iter().any(|route| route.parse(path).is_some())
    }

    /// Remove every route.
    pub fn clear(&mut self) {
        self.routes.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over routes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Route>> {
        self.routes.iter()
    }

    fn position(&self, template: &str) -> Option<usize> {
        self.routes.iter().position(|r| r.original() == template)
    }

    fn try_match(route: &Arc<Route>, path: &str) -> Option<PointerMatch> {
        route.parse(path).map(|params| PointerMatch {
            params,
            route: route.clone(),
            template: route.original().to_string(),
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_root() {
        let mut pointer = Pointer::new();
        pointer.add("/").unwrap();
        assert!(pointer.test("/"));
        assert!(pointer.test(""));
        assert!(!pointer.test("/a"));
    }

    #[test]
    fn test_default_pattern() {
        let mut pointer = Pointer::new();
        pointer.add("/users/{id}").unwrap();
        assert!(pointer.test("/users/user-name"));
        assert!(!pointer.test("/users/user.name"));
    }

    #[test]
    fn test_first_inserted_wins() {
        let mut pointer = Pointer::new();
        pointer.add("/p/{slug}").unwrap().add("/p/{id:[0-9]+}").unwrap();

        let matched = pointer.match_path("/p/42").unwrap();
        assert_eq!(matched.template, "/p/{slug}");
        assert_eq!(matched.params.get("slug"), Some("42"));
        assert_eq!(matched.path, "/p/42");

        let all = pointer.matches("/p/42");
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].template, "/p/{id:[0-9]+}");
    }

    #[test]
    fn test_readd_replaces_in_place() {
        let mut pointer = Pointer::new();
        pointer.add("/a").unwrap().add("/b").unwrap().add("/a/").unwrap();

        assert_eq!(pointer.len(), 2);
        let order: Vec<_> = pointer.iter().map(|r| r.original().to_string()).collect();
        assert_eq!(order, ["/a", "/b"]);
    }

    #[test]
    fn test_nested_params() {
        let mut pointer = Pointer::new();
        pointer
            .add("/posts/{postId:[0-9]+}/comments/{commentId:[0-9]+}/lines/{lineId:[0-9]+}")
            .unwrap();

        assert!(pointer.test("/posts/1/comments/2/lines/3"));
        assert!(pointer.test("/posts/0/comments/0/lines/0"));
        assert!(!pointer.test("/posts/1/comments/2/lines/a"));
        assert!(!pointer.test("/posts/1/comments/a/lines/0"));
        assert!(!pointer.test("/posts/a/comments/2/lines/3"));
    }

    #[test]
    fn test_resolve() {
        let mut pointer = Pointer::new();
        pointer.add("/users/{id:[0-9]+}").unwrap();

        let path = pointer
            .resolve("/users/{id:[0-9]+}", &Params::new().with("id", "100"))
            .unwrap();
        assert_eq!(path, "/users/100");

        assert!(matches!(
            pointer.resolve("/users/{id:[0-9]+}", &Params::new()),
            Err(RouteError::Unresolvable { .. })
        ));
    }

    #[test]
    fn test_resolve_long_route() {
        let template = "/posts/{id:[0-9]+}/comments/{commentId:[a-zA-Z0-9-]+}";
        let mut pointer = Pointer::new();
        pointer.add(template).unwrap();

        let params = Params::new()
            .with("commentId", "PRmcQOTpaP-7092167576")
            .with("id", "230");
        assert_eq!(
            pointer.resolve(template, &params).unwrap(),
            "/posts/230/comments/PRmcQOTpaP-7092167576"
        );
    }

    #[test]
    fn test_get_or_fail() {
        let err = Pointer::new().get_or_fail("/users").unwrap_err();
        assert!(matches!(err, RouteError::RouteNotFound(_)));
        assert!(err.to_string().contains("could not find route"));
    }

    #[test]
    fn test_accepts_precompiled_route() {
        let route = Arc::new(Route::new("/{a:[0-9]+}/{b:[0-9]+}").unwrap());
        let mut pointer = Pointer::new();
        pointer.add_route(route.clone());

        let stored = pointer.get_or_fail("/{a:[0-9]+}/{b:[0-9]+}").unwrap();
        assert!(Arc::ptr_eq(&stored, &route));
    }

    #[test]
    fn test_clear() {
        let mut pointer = Pointer::new();
        pointer.add("/").unwrap();
        pointer.clear();
        assert!(pointer.is_empty());
        assert!(pointer.match_path("/").is_none());
    }

    #[test]
    fn test_from_config() {
        let routes = vec![
            RouteConfig { name: Some("home".into()), path: "/".into() },
            RouteConfig { name: None, path: "/books/{id:[0-9]+}".into() },
        ];
        let pointer = Pointer::from_config(&routes).unwrap();
        assert_eq!(pointer.len(), 2);
        assert!(pointer.test("/books/9"));

        let bad = vec![RouteConfig { name: None, path: "/books/{id".into() }];
        assert!(Pointer::from_config(&bad).is_err());
    }
}
