//! Routing error definitions.

use thiserror::Error;

/// Errors raised while compiling templates or looking routes up.
///
/// A path that simply fails to match a template is not an error; matching
/// reports it as `None`.
#[derive(Debug, Error)]
pub enum RouteError {
    /// A `{` was opened but the parameter never closed.
    #[error("expected `{expected}` at offset {offset}: {template}")]
    MalformedTemplate {
        template: String,
        offset: usize,
        expected: char,
    },

    /// A parameter was declared without a name.
    #[error("parameter at offset {offset} has no name: {template}")]
    UnnamedParam { template: String, offset: usize },

    /// The same parameter name appears twice in one template.
    #[error("found repeated param \"{name}\" on route \"{template}\"")]
    DuplicateParam { template: String, name: String },

    /// A parameter pattern is not a valid regular expression.
    #[error("invalid pattern for param \"{name}\" on route \"{template}\": {source}")]
    InvalidPattern {
        template: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    /// No route is registered under the template.
    #[error("could not find route: {0}")]
    RouteNotFound(String),

    /// Parameters were missing or rejected by their pattern.
    #[error("could not resolve route \"{template}\" with the given params")]
    Unresolvable { template: String },
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
