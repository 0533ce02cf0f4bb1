//! Navigation error definitions.

use thiserror::Error;

use crate::routing::RouteError;

/// Boxed error returned by route callbacks and before-hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while registering routes or navigating.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A route with the same name is already registered.
    #[error("route \"{0}\" is already registered")]
    DuplicateRoute(String),

    /// No route is registered under the given name.
    #[error("no route named \"{0}\"")]
    UnknownRoute(String),

    /// Template compilation or resolution failed.
    #[error(transparent)]
    Route(#[from] RouteError),

    /// A before-hook called `push`/`replace` more than once.
    #[error("you can only execute `push` or `replace` once while inside `on_before`")]
    MultipleRedirect,

    /// A redirect handle was used after its before-hook completed.
    #[error("redirect handle used after its `on_before` hook completed")]
    RedirectClosed,

    /// A navigation listener panicked.
    #[error("listener panicked: {0}")]
    Listener(String),

    /// A route callback or before-hook failed.
    #[error("callback failed: {0}")]
    Callback(#[source] BoxError),
}

/// Result type for navigation operations.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RouterError::UnknownRoute("books".into());
        assert_eq!(err.to_string(), "no route named \"books\"");

        let err: RouterError = RouteError::RouteNotFound("/x".into()).into();
        assert_eq!(err.to_string(), "could not find route: /x");

        let err = RouterError::Callback("boom".into());
        assert_eq!(err.to_string(), "callback failed: boom");
    }
}
